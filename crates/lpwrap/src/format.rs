//! Plain-text exchange with external LP tooling: the `.lp` model format
//! (write only) and the `.sol` solution format (read only).

use std::collections::HashMap;
use std::io::{BufRead, Write};

use thiserror::Error;

use crate::condense::{condense_constraint, condense_terms, Coefficients};
use crate::model::{Lp, OptKind};

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected `<name> <value>`, found {found} tokens")]
    TokenCount { line: usize, found: usize },
    #[error("line {line}: invalid number {text:?}")]
    InvalidNumber { line: usize, text: String },
}

/// Write `lp` in the `.lp` model format.
///
/// ```text
/// Minimize
///     5 a + 3 c
///
/// Subject To
/// 1 b >= 3
/// 1 b + 1 c = 10
/// ```
///
/// Terms appear in variable-name order and zero coefficients are skipped.
/// The objective's constant offset is not written; the format has no slot
/// for it. Stops at the first failed write.
pub fn write_model<W: Write>(w: &mut W, lp: &Lp) -> Result<(), FormatError> {
    for line in model_lines(lp) {
        writeln!(w, "{}", line)?;
    }
    w.flush()?;

    tracing::debug!(
        component = "format",
        operation = "write_model",
        status = "success",
        num_constraints = lp.constraints.len(),
        "Wrote LP model"
    );
    Ok(())
}

/// [`write_model`] into a string
pub fn model_to_string(lp: &Lp) -> String {
    let mut out = String::new();
    for line in model_lines(lp) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn model_lines(lp: &Lp) -> Vec<String> {
    let mut lines = Vec::with_capacity(lp.constraints.len() + 4);

    lines.push(
        match lp.objective.kind {
            OptKind::Maximize => "Maximize",
            OptKind::Minimize => "Minimize",
        }
        .to_string(),
    );

    let objective = condense_terms(&lp.objective.terms);
    lines.push(format!("\t{}", join_terms(&objective.coeffs)));
    lines.push(String::new());

    lines.push("Subject To".to_string());
    for constraint in &lp.constraints {
        // Display keeps the written comparator, so `>=` rows are not negated
        let condensed = condense_constraint(constraint);
        lines.push(format!(
            "{} {} {}",
            join_terms(&condensed.coeffs),
            constraint.comp.token(),
            format_general(condensed.constant)
        ));
    }

    lines
}

fn join_terms(coeffs: &Coefficients) -> String {
    coeffs
        .iter()
        .filter(|&(_, &value)| value != 0.0)
        .map(|(name, &value)| format!("{} {}", format_general(value), name))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Read `<name> <value>` pairs from a `.sol` file.
///
/// Blank lines and lines starting with `#` are skipped. A name seen twice
/// keeps its last value.
pub fn parse_solution<R: BufRead>(reader: R) -> Result<HashMap<String, f64>, FormatError> {
    let mut values = HashMap::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let &[name, text] = tokens.as_slice() else {
            return Err(FormatError::TokenCount {
                line: i + 1,
                found: tokens.len(),
            });
        };
        let value = text.parse::<f64>().map_err(|_| FormatError::InvalidNumber {
            line: i + 1,
            text: text.to_string(),
        })?;
        values.insert(name.to_string(), value);
    }

    tracing::debug!(
        component = "format",
        operation = "parse_solution",
        status = "success",
        num_values = values.len(),
        "Parsed solution file"
    );
    Ok(values)
}

/// Format `value` as a general decimal with 16 significant digits.
///
/// Trailing zeros are dropped. Exponent notation (`1e+20`, `1.5e-05`) is used
/// when the decimal exponent is below -4 or at least 16.
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    // d.ddddddddddddddde<exp>
    let sci = format!("{:.15e}", value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let digits = match digits.trim_end_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };

    let mut out = String::from(sign);
    if exp < -4 || exp >= 16 {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let exp_sign = if exp < 0 { '-' } else { '+' };
        out.push_str(&format!("e{}{:02}", exp_sign, exp.unsigned_abs()));
    } else if exp < 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-exp - 1) as usize));
        out.push_str(digits);
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            out.push_str(digits);
            out.extend(std::iter::repeat_n('0', int_len - digits.len()));
        } else {
            out.push_str(&digits[..int_len]);
            out.push('.');
            out.push_str(&digits[int_len..]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constraint, Objective, Term};

    fn reference_lp() -> Lp {
        Lp::new(Objective::minimize(vec![
            Term::var("c", 3.0),
            Term::var("a", 5.0),
            Term::constant(6.0),
        ]))
        .subject_to(Constraint::ge(vec![Term::var("b", 1.0)], vec![Term::constant(3.0)]))
        .subject_to(Constraint::eq(
            vec![Term::var("c", 1.0), Term::var("b", 1.0)],
            vec![Term::constant(10.0)],
        ))
        .subject_to(Constraint::ge(vec![Term::var("a", 1.0)], vec![Term::var("b", 2.0)]))
        .subject_to(Constraint::ge(
            vec![Term::var("c", 3.0), Term::constant(5.0)],
            vec![Term::var("a", 1.0)],
        ))
        .subject_to(Constraint::le(vec![Term::var("c", 1.0)], vec![Term::constant(9.0)]))
    }

    #[test]
    fn test_write_reference_model() {
        let text = model_to_string(&reference_lp());

        let expected = "Minimize\n\
                        \t5 a + 3 c\n\
                        \n\
                        Subject To\n\
                        1 b >= 3\n\
                        1 b + 1 c = 10\n\
                        1 a + -2 b >= 0\n\
                        -1 a + 3 c >= -5\n\
                        1 c <= 9\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_write_matches_string() {
        let lp = reference_lp();
        let mut buf = Vec::new();
        write_model(&mut buf, &lp).unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), model_to_string(&lp));
    }

    #[test]
    fn test_write_skips_zero_terms() {
        let lp = Lp::new(Objective::maximize(vec![Term::var("x", 1.0), Term::var("x", -1.0), Term::var("y", 0.5)]))
            .subject_to(Constraint::le(
                vec![Term::var("x", 2.0), Term::var("y", 1.0)],
                vec![Term::var("x", 2.0), Term::constant(0.1)],
            ));

        let text = model_to_string(&lp);

        assert_eq!(text, "Maximize\n\t0.5 y\n\nSubject To\n1 y <= 0.1\n");
    }

    struct FailingWriter {
        lines_left: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.lines_left == 0 {
                return Err(std::io::Error::other("disk full"));
            }
            if buf.contains(&b'\n') {
                self.lines_left -= 1;
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_is_returned() {
        let mut w = FailingWriter { lines_left: 2 };

        let err = write_model(&mut w, &reference_lp()).unwrap_err();

        assert!(matches!(err, FormatError::Io(_)));
        assert_eq!(err.to_string(), "IO error: disk full");
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let source = "# Solution for model lp\n\n   x 1.5  \n";

        let values = parse_solution(source.as_bytes()).unwrap();

        assert_eq!(values, HashMap::from([("x".to_string(), 1.5)]));
    }

    #[test]
    fn test_parse_last_value_wins() {
        let source = "x 1\ny\t-2e3\nx 4\n";

        let values = parse_solution(source.as_bytes()).unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values["x"], 4.0);
        assert_eq!(values["y"], -2000.0);
    }

    #[test]
    fn test_parse_wrong_token_count() {
        let err = parse_solution("# header\nx 1\ny 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::TokenCount { line: 3, found: 3 }), "{:?}", err);

        let err = parse_solution("lonely\n".as_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::TokenCount { line: 1, found: 1 }), "{:?}", err);
    }

    #[test]
    fn test_parse_bad_number() {
        let err = parse_solution("x one\n".as_bytes()).unwrap_err();

        match err {
            FormatError::InvalidNumber { line, text } => {
                assert_eq!(line, 1);
                assert_eq!(text, "one");
            }
            other => panic!("expected invalid number, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_solution("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_format_general() {
        assert_eq!(format_general(57.0), "57");
        assert_eq!(format_general(-3.0), "-3");
        assert_eq!(format_general(0.0), "0");
        assert_eq!(format_general(0.1), "0.1");
        assert_eq!(format_general(0.1 + 0.2), "0.3");
        assert_eq!(format_general(1.0 / 3.0), "0.3333333333333333");
        assert_eq!(format_general(1234567.125), "1234567.125");
        assert_eq!(format_general(0.0001), "0.0001");
        assert_eq!(format_general(0.000015), "1.5e-05");
        assert_eq!(format_general(1e15), "1000000000000000");
        assert_eq!(format_general(1e16), "1e+16");
        assert_eq!(format_general(-2.5e20), "-2.5e+20");
        assert_eq!(format_general(1e-100), "1e-100");
        assert_eq!(format_general(f64::INFINITY), "+Inf");
        assert_eq!(format_general(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_general(f64::NAN), "NaN");
    }
}
