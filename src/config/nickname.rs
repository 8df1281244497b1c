//! Fallback nickname for when none is configured.
//!
//! Produces `logbotNNNN` (e.g. `logbot0427`), short enough for servers that
//! still enforce a small nickname limit.

use rand::RngExt;

const BASE: &str = "logbot";

pub fn generate_nickname() -> String {
    let mut rng = rand::rng();
    let num: u16 = rng.random_range(0..10000);
    format!("{}{:04}", BASE, num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_nickname_shape() {
        let nick = generate_nickname();
        assert_eq!(nick.len(), BASE.len() + 4);
        assert!(nick.starts_with(BASE));
        assert!(nick[BASE.len()..].chars().all(|c| c.is_ascii_digit()));
    }
}
