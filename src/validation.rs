use serde_json::Value;

/// Predicate
///
/// The built-in field predicates. `Present` requires the field to exist and
/// be a non-empty string after trimming; `Email` requires a local@domain
/// shape with a dotted domain. An absent field fails both, which is how a
/// missing email address produces two messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Present,
    Email,
}

/// FieldRule
///
/// One declarative validation rule: which body field, which predicate, and
/// the exact message to collect when the predicate fails.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    pub predicate: Predicate,
    pub message: &'static str,
}

impl FieldRule {
    pub const fn new(field: &'static str, predicate: Predicate, message: &'static str) -> Self {
        FieldRule {
            field,
            predicate,
            message,
        }
    }
}

/// user_rules
///
/// The canonical registration rule list. Order matters: violation messages
/// are collected in declaration order.
pub fn user_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(
            "firstName",
            Predicate::Present,
            "Please provide a first name",
        ),
        FieldRule::new("lastName", Predicate::Present, "Please provide a last name"),
        FieldRule::new(
            "emailAddress",
            Predicate::Present,
            "Please provide an \"email\" address",
        ),
        FieldRule::new(
            "emailAddress",
            Predicate::Email,
            "Please provide a valid \"email\" address",
        ),
        FieldRule::new("password", Predicate::Present, "Please provide a password"),
    ]
}

/// validate
///
/// Runs every rule against the parsed JSON body, never short-circuiting, and
/// returns all violated messages in declaration order. An empty vec means the
/// body passed.
pub fn validate(rules: &[FieldRule], body: &Value) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| !check(rule, body))
        .map(|rule| rule.message.to_string())
        .collect()
}

fn check(rule: &FieldRule, body: &Value) -> bool {
    let value = body.get(rule.field).and_then(Value::as_str);
    match rule.predicate {
        Predicate::Present => matches!(value, Some(s) if !s.trim().is_empty()),
        Predicate::Email => matches!(value, Some(s) if is_valid_email(s)),
    }
}

/// is_valid_email
///
/// Syntactic local@domain check: non-empty local part, dotted domain, no
/// whitespace. Deliverability is out of scope.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    // The domain needs at least one interior dot: "a.b" yes, ".b" / "a." no.
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
