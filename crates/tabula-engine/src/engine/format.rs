/// Format a number for display and for canonical formula text.
///
/// Uses the shortest representation that round-trips, so `8.0` prints as
/// `8` and `0.1 + 0.2` keeps all of its digits.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Avoid "-0".
        "0".to_string()
    } else {
        format!("{}", n)
    }
}
