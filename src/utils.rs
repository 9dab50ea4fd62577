/// Splits a `KEY=VALUE` pair on the first `=`.
///
/// Anything after the first `=` belongs to the value, so `URL=a?b=c` keeps
/// `a?b=c` intact. Text without any `=` becomes a key with an empty value.
pub fn split_kv(pair: &str) -> (String, String) {
    match pair.split_once('=') {
        Some((key, value)) => (String::from(key), String::from(value)),
        None => (String::from(pair), String::new()),
    }
}
