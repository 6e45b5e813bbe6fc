/// Replace `${NAME}` placeholders with environment values.
///
/// Unknown names and unterminated placeholders are kept verbatim.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

pub(crate) fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "DB" => Some("sqlite:test.db".into()),
            "PORT" => Some("8080".into()),
            _ => None,
        }
    }

    #[test]
    fn replaces_known_vars() {
        assert_eq!(
            substitute_with("url = \"${DB}\"\nport = ${PORT}", lookup),
            "url = \"sqlite:test.db\"\nport = 8080"
        );
    }

    #[test]
    fn keeps_unknown_and_empty_placeholders() {
        assert_eq!(substitute_with("${NOPE} ${}", lookup), "${NOPE} ${}");
    }

    #[test]
    fn keeps_unterminated_placeholder() {
        assert_eq!(substitute_with("a ${DB", lookup), "a ${DB");
    }

    #[test]
    fn plain_dollars_pass_through() {
        assert_eq!(substitute_with("$DB costs $5", lookup), "$DB costs $5");
    }
}
