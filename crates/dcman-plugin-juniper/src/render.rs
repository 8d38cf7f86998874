//! Rendering of configuration deltas into Junos set/delete command lines

use dcman_plugin::{ConfigDelta, ConfigOp};

/// Render one operation as a command line.
///
/// Values containing whitespace are quoted; paths are joined verbatim
/// since path elements may themselves carry arguments ("unit 5").
pub fn render_op(op: &ConfigOp) -> String {
    match op {
        ConfigOp::Set { path, value } => {
            if value.is_empty() {
                format!("set {}", path.join(" "))
            } else {
                format!("set {} {}", path.join(" "), quote(value))
            }
        }
        ConfigOp::Delete { path } => format!("delete {}", path.join(" ")),
    }
}

/// Render a whole delta in order
pub fn render_delta(delta: &ConfigDelta) -> Vec<String> {
    delta.ops.iter().map(render_op).collect()
}

fn quote(value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_set_and_delete() {
        let delta = ConfigDelta::new()
            .set(&["system", "host-name"], "leaf-1")
            .set(&["system", "login", "message"], "authorized use only")
            .set(&["routing-options", "router-id"], "10.0.0.1")
            .delete(&["interfaces", "xe-0/0/0"]);

        assert_eq!(
            render_delta(&delta),
            vec![
                "set system host-name leaf-1",
                "set system login message \"authorized use only\"",
                "set routing-options router-id 10.0.0.1",
                "delete interfaces xe-0/0/0",
            ]
        );
    }

    #[test]
    fn test_render_set_without_value() {
        let delta = ConfigDelta::new().set(&["protocols", "lldp", "interface all"], "");
        assert_eq!(render_delta(&delta), vec!["set protocols lldp interface all"]);
    }
}
