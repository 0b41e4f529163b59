//! Route tree output formats.
//!
//! The listing format mirrors what host routers print for their route
//! table, and doubles as the built-in migration snapshot:
//!
//! ```text
//! <Routes>
//!   <Route id="admin/_layout" path="admin" file="routes/admin/_layout.tsx">
//!     <Route id="admin/_index" index file="routes/admin/_index.tsx" />
//!   </Route>
//! </Routes>
//! ```

use super::manifest::RouteNode;
use std::fmt::Write;

/// Serialize the tree as JSON.
pub fn to_json(tree: &[RouteNode], pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(tree)
    } else {
        serde_json::to_string(tree)
    }
}

/// Render the tree as a JSX-like listing.
pub fn to_listing(tree: &[RouteNode]) -> String {
    let mut out = String::from("<Routes>\n");
    for node in tree {
        write_node(&mut out, node, 1);
    }
    out.push_str("</Routes>\n");
    out
}

fn write_node(out: &mut String, node: &RouteNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}<Route id=\"{}\"", escape(&node.id));
    if let Some(path) = &node.path {
        let _ = write!(out, " path=\"{}\"", escape(path));
    }
    if node.index {
        out.push_str(" index");
    }
    if let Some(file) = &node.file {
        let _ = write!(out, " file=\"{}\"", escape(file));
    }

    if node.children.is_empty() {
        out.push_str(" />\n");
        return;
    }
    out.push_str(">\n");
    for child in &node.children {
        write_node(out, child, depth + 1);
    }
    let _ = writeln!(out, "{indent}</Route>");
}

fn escape(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, path: Option<&str>, index: bool) -> RouteNode {
        RouteNode {
            id: id.into(),
            file: Some(format!("routes/{id}.tsx")),
            path: path.map(String::from),
            index,
            children: Vec::new(),
        }
    }

    fn sample() -> Vec<RouteNode> {
        let mut admin = leaf("admin", Some("admin"), false);
        admin.children = vec![
            leaf("admin/users", Some("users"), false),
            leaf("admin/index", None, true),
        ];
        vec![admin, leaf("about", Some("about"), false)]
    }

    #[test]
    fn test_listing() {
        let expected = "\
<Routes>
  <Route id=\"admin\" path=\"admin\" file=\"routes/admin.tsx\">
    <Route id=\"admin/users\" path=\"users\" file=\"routes/admin/users.tsx\" />
    <Route id=\"admin/index\" index file=\"routes/admin/index.tsx\" />
  </Route>
  <Route id=\"about\" path=\"about\" file=\"routes/about.tsx\" />
</Routes>
";
        assert_eq!(to_listing(&sample()), expected);
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(to_listing(&[]), "<Routes>\n</Routes>\n");
    }

    #[test]
    fn test_json() {
        let json = to_json(&[leaf("about", Some("about"), false)], false).unwrap();
        assert_eq!(json, r#"[{"id":"about","file":"routes/about.tsx","path":"about"}]"#);
        assert!(to_json(&sample(), true).unwrap().contains("\n  {"));
    }

    #[test]
    fn test_attribute_escaping() {
        let node = RouteNode {
            id: "a\"b".into(),
            file: None,
            path: None,
            index: false,
            children: Vec::new(),
        };
        assert!(to_listing(&[node]).contains("id=\"a&quot;b\""));
    }
}
