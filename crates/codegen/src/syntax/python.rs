use super::Syntax;
use flowcode_graph::CastMode;
use once_cell::sync::Lazy;
use regex::Regex;

static SQRT_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bsqrt\s*\(").expect("valid sqrt call pattern"));
static MATH_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bmath\.").expect("valid math reference pattern"));

/// Trim, qualify bare `sqrt(` calls and turn `^` into `**`
#[must_use]
pub fn normalize_expr(expr: &str) -> String {
    let s = expr.trim();
    let mut out = String::with_capacity(s.len() + 8);
    let mut last = 0;

    for m in SQRT_CALL.find_iter(s) {
        out.push_str(&s[last..m.start()]);
        if s[..m.start()].ends_with('.') {
            // already qualified (`math.sqrt(`, `np.sqrt(`)
            out.push_str(m.as_str());
        } else {
            out.push_str("math.sqrt(");
        }
        last = m.end();
    }
    out.push_str(&s[last..]);

    out.replace('^', "**")
}

/// Condition rewriting: unicode comparisons, lone `=` promoted to `==`,
/// then everything [`normalize_expr`] does
#[must_use]
pub fn normalize_condition(cond: &str) -> String {
    let ascii = cond
        .trim()
        .replace('≤', "<=")
        .replace('≥', ">=")
        .replace('≠', "!=");
    normalize_expr(&promote_equality(&ascii))
}

/// `=` not touching `<`, `>`, `=` or `!` becomes `==`
fn promote_equality(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '=' {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            if !matches!(prev, Some('<' | '>' | '=' | '!')) && next != Some('=') {
                out.push_str("==");
                continue;
            }
        }
        out.push(c);
    }

    out
}

/// Whether `text` calls `sqrt` or references the `math` module
#[must_use]
pub fn uses_helper(text: &str) -> bool {
    SQRT_CALL.is_match(text) || MATH_REF.is_match(text)
}

/// Python 3 output
#[derive(Debug, Clone, Copy, Default)]
pub struct Python;

impl Syntax for Python {
    fn name(&self) -> &'static str {
        "python"
    }

    fn normalize_expr(&self, expr: &str) -> String {
        normalize_expr(expr)
    }

    fn normalize_condition(&self, cond: &str) -> String {
        normalize_condition(cond)
    }

    fn uses_helper(&self, text: &str) -> bool {
        uses_helper(text)
    }

    fn helper_import(&self) -> &'static str {
        "import math"
    }

    fn comment(&self, text: &str) -> String {
        if text.is_empty() {
            "#".to_string()
        } else {
            format!("# {text}")
        }
    }

    fn no_op(&self) -> &'static str {
        "pass"
    }

    fn return_stmt(&self, value: Option<&str>) -> String {
        match value {
            Some(value) => format!("return {value}"),
            None => "return".to_string(),
        }
    }

    fn print_stmt(&self, value: Option<&str>) -> String {
        format!("print({})", value.unwrap_or_default())
    }

    fn input_stmt(&self, var: &str, cast: CastMode) -> String {
        match cast {
            CastMode::Raw => format!("{var} = input(\"{var}: \")"),
            cast => format!("{var} = {}(input(\"{var}: \"))", cast.as_str()),
        }
    }

    fn call_stmt(&self, callee: &str, args: &[String], target: Option<&str>) -> String {
        let call = format!("{callee}({})", args.join(", "));
        match target {
            Some(target) => format!("{target} = {call}"),
            None => call,
        }
    }

    fn if_header(&self, cond: &str) -> String {
        format!("if {cond}:")
    }

    fn else_header(&self) -> String {
        "else:".to_string()
    }

    fn counted_loop_header(&self, var: &str, start: &str, end: &str, step: &str) -> String {
        // range() excludes its bound; push it one unit further in the step's direction
        let bound = if step.starts_with('-') {
            format!("({end}) - 1")
        } else {
            format!("({end}) + 1")
        };
        if step == "1" {
            format!("for {var} in range({start}, {bound}):")
        } else {
            format!("for {var} in range({start}, {bound}, {step}):")
        }
    }

    fn conditional_loop_header(&self, cond: &str) -> String {
        format!("while {cond}:")
    }

    fn program(&self, entry_name: &str, body: &str, with_helper: bool, pad: &str) -> String {
        let mut lines: Vec<String> = Vec::new();
        if with_helper {
            lines.push(self.helper_import().to_string());
        }
        lines.push(format!("def {entry_name}():"));
        if body.trim().is_empty() {
            lines.push(format!("{pad}{}", self.no_op()));
        } else {
            lines.push(body.to_string());
        }
        lines.push(String::new());
        lines.push("if __name__ == \"__main__\":".to_string());
        lines.push(format!("{pad}{entry_name}()"));
        lines.push(String::new());
        lines.join("\n")
    }

    fn no_entry_diagnostic(&self) -> String {
        self.comment("No Start node found")
    }
}
