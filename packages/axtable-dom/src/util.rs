/// Parse a string with the HTML "rules for parsing integers".
///
/// Leading ASCII whitespace is skipped, an optional sign is honoured and parsing stops at
/// the first non-digit. Returns `None` when there are no digits or the value overflows.
///
/// <https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#rules-for-parsing-integers>
pub fn parse_html_integer(input: &str) -> Option<i32> {
    let input = input.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, digits) = match input.as_bytes().first()? {
        b'-' => (true, &input[1..]),
        b'+' => (false, &input[1..]),
        _ => (false, input),
    };

    let digits = digits
        .bytes()
        .take_while(|byte| byte.is_ascii_digit())
        .collect::<Vec<_>>();
    if digits.is_empty() {
        return None;
    }

    let mut value: i64 = 0;
    for digit in digits {
        value = value.checked_mul(10)?.checked_add(i64::from(digit - b'0'))?;
        if value > i64::from(i32::MAX) + 1 {
            return None;
        }
    }
    let value = if negative { -value } else { value };
    i32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::parse_html_integer;

    #[test]
    fn parses_html_integers() {
        assert_eq!(parse_html_integer("3"), Some(3));
        assert_eq!(parse_html_integer("  \t12abc"), Some(12));
        assert_eq!(parse_html_integer("+7"), Some(7));
        assert_eq!(parse_html_integer("-1"), Some(-1));
        assert_eq!(parse_html_integer("0"), Some(0));
        assert_eq!(parse_html_integer("abc"), None);
        assert_eq!(parse_html_integer(""), None);
        assert_eq!(parse_html_integer("-"), None);
        assert_eq!(parse_html_integer("99999999999"), None);
        assert_eq!(parse_html_integer("-2147483648"), Some(i32::MIN));
    }
}
