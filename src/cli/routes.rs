//! `routes` command: print the compiled route tree to stdout.

use super::Format;
use crate::config::ProjectConfig;
use crate::tree::{RouteNode, route_tree, to_json, to_listing};
use crate::utils::plural_count;
use crate::{debug, log};
use anyhow::Result;
use std::io::Write;

pub fn print_routes(config: &ProjectConfig, format: Format, pretty: bool) -> Result<()> {
    debug!("routes"; "app dir {}", config.routes.app_dir.display());
    let tree = route_tree(&config.routes)?;

    let output = match format {
        Format::Json => {
            let mut json = to_json(&tree, pretty)?;
            json.push('\n');
            json
        }
        Format::Listing => to_listing(&tree),
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    log!("routes"; "{}", plural_count(count(&tree), "route"));
    Ok(())
}

fn count(nodes: &[RouteNode]) -> usize {
    nodes.iter().map(|n| 1 + count(&n.children)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, children: Vec<RouteNode>) -> RouteNode {
        RouteNode {
            id: id.into(),
            file: None,
            path: None,
            index: false,
            children,
        }
    }

    #[test]
    fn test_count_nested() {
        let tree = vec![
            node("a", vec![node("a/b", vec![node("a/b/c", Vec::new())])]),
            node("d", Vec::new()),
        ];
        assert_eq!(count(&tree), 4);
        assert_eq!(count(&[]), 0);
    }
}
