//! Identifier generation
//!
//! All generated IDs use the format: `{prefix}_{8-char-hex}`
//! Example: `obj_3f9a1c2e`, `task_b07d44e1`

/// Prefix for generated objective IDs
pub const OBJECTIVE_PREFIX: &str = "obj";

/// Prefix for generated task IDs
pub const TASK_PREFIX: &str = "task";

/// Generate a random ID with the given prefix
pub fn generate_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &uuid[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id(OBJECTIVE_PREFIX);
        assert!(id.starts_with("obj_"));
        assert_eq!(id.len(), "obj_".len() + 8);
        assert!(id["obj_".len()..].chars().all(|c| c.is_ascii_hexdigit()));

        let id = generate_id(TASK_PREFIX);
        assert!(id.starts_with("task_"));
        assert_eq!(id.len(), "task_".len() + 8);
    }

    #[test]
    fn test_generate_id_varies() {
        let a = generate_id(TASK_PREFIX);
        let b = generate_id(TASK_PREFIX);
        assert_ne!(a, b);
    }
}
