//! Width-budgeted rendering.
//!
//! A value is printed flat when it fits in the space left on the current
//! line. Otherwise records and vectors break after each separator, with the
//! continuation lines aligned one column past the opening bracket. Scalars
//! are never split.

use crate::{records::Record, value::Value};

/// Line width used when the caller has no preference.
pub const DEFAULT_WIDTH: usize = 79;

pub fn record(record: &Record, width: usize) -> String {
    let mut out = String::new();
    write_record(&mut out, record, 0, width);
    out
}

pub fn value(value: &Value, width: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0, width);
    out
}

impl Value {
    pub fn to_pretty_string(&self, width: usize) -> String {
        value(self, width)
    }
}

fn column(out: &str) -> usize {
    out.rsplit('\n').next().map_or(0, |line| line.chars().count())
}

fn fits(out: &str, text: &str, trailing: usize, width: usize) -> bool {
    column(out) + text.chars().count() + trailing <= width
}

fn newline(out: &mut String, indent: usize) {
    out.push('\n');
    out.extend(std::iter::repeat_n(' ', indent));
}

/// `trailing` counts the characters that will follow `value` on its last
/// line: separators and the closing brackets of its enclosing containers.
fn write_value(out: &mut String, value: &Value, trailing: usize, width: usize) {
    match value {
        Value::Record(record) => write_record(out, record, trailing, width),
        Value::Vector(items) => write_vector(out, items, trailing, width),
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Characters following item `i` of `len`: its `,`, or for the last item the
/// closing bracket plus whatever follows the container.
fn trailing_after(i: usize, len: usize, trailing: usize) -> usize {
    if i + 1 == len { trailing + 1 } else { 1 }
}

fn write_record(out: &mut String, record: &Record, trailing: usize, width: usize) {
    let flat = record.to_string();
    if fits(out, &flat, trailing, width) {
        out.push_str(&flat);
        return;
    }

    out.push_str(&record.rtd().display_name());
    out.push('[');
    let indent = column(out);
    let len = record.values().len();
    let attrs = record.rtd().attributes().iter().zip(record.values());
    for (i, (name, value)) in attrs.enumerate() {
        if i > 0 {
            out.push(',');
            newline(out, indent);
        }
        let attr_start = column(out);
        out.push_str(&name.to_str());
        out.push('=');
        let after = trailing_after(i, len, trailing);
        let is_scalar = !matches!(value, Value::Record(_) | Value::Vector(_));
        if is_scalar && !fits(out, &value.to_string(), after, width) {
            newline(out, attr_start + 1);
        }
        write_value(out, value, after, width);
    }
    out.push(']');
}

fn write_vector(out: &mut String, items: &[Value], trailing: usize, width: usize) {
    let flat = Value::Vector(items.into()).to_string();
    if fits(out, &flat, trailing, width) {
        out.push_str(&flat);
        return;
    }

    out.push('[');
    let indent = column(out);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
            newline(out, indent);
        }
        write_value(out, item, trailing_after(i, items.len(), trailing), width);
    }
    out.push(']');
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::records::RecordType;

    fn item() -> Arc<RecordType> {
        RecordType::from_names(Some("Item"), &["foo", "bar"])
    }

    #[test]
    fn short_records_stay_flat() {
        let record = item().of(crate::attrs! { foo: 1, bar: 2 }).unwrap();
        assert_eq!(record.to_pretty_string(DEFAULT_WIDTH), "Item[foo=1, bar=2]");
    }

    #[test]
    fn long_records_break_between_attributes() {
        let record = item()
            .of(crate::attrs! { foo: "x".repeat(60), bar: "y".repeat(60) })
            .unwrap();
        let expected = format!(
            "Item[foo=\"{}\",\n     bar=\"{}\"]",
            "x".repeat(60),
            "y".repeat(60)
        );
        assert_eq!(record.to_pretty_string(DEFAULT_WIDTH), expected);
    }

    #[test]
    fn oversized_values_move_below_their_name() {
        let record = item()
            .of(crate::attrs! { foo: "x".repeat(60), bar: "y".repeat(70) })
            .unwrap();
        let expected = format!(
            "Item[foo=\"{}\",\n     bar=\n      \"{}\"]",
            "x".repeat(60),
            "y".repeat(70)
        );
        assert_eq!(record.to_pretty_string(DEFAULT_WIDTH), expected);
    }

    #[test]
    fn nested_records_indent_under_their_own_bracket() {
        let inner = item().of(crate::attrs! { foo: 1, bar: 2 }).unwrap();
        let outer = RecordType::from_names(Some("Outer"), &["left", "right"])
            .of(crate::attrs! { left: inner.clone(), right: inner })
            .unwrap();
        let expected = format!(
            "Outer[left=Item[foo=1,\n{}bar=2],\n{}right=Item[foo=1,\n{}bar=2]]",
            " ".repeat(16),
            " ".repeat(6),
            " ".repeat(17)
        );
        assert_eq!(outer.to_pretty_string(24), expected);
    }

    #[test]
    fn vectors_break_between_items() {
        let vec = Value::from(vec![Value::from("a".repeat(10)), Value::from("b".repeat(10))]);
        assert_eq!(
            vec.to_pretty_string(20),
            format!("[\"{}\",\n \"{}\"]", "a".repeat(10), "b".repeat(10))
        );
    }

    #[test]
    fn separators_after_nested_records_count_against_the_width() {
        let inner = RecordType::from_names(Some("I"), &["a"])
            .of(crate::attrs! { a: 1234567 })
            .unwrap();
        let outer = RecordType::from_names(Some("O"), &["x", "y"])
            .of(crate::attrs! { x: inner, y: 1 })
            .unwrap();
        assert_eq!(
            outer.to_pretty_string(16),
            "O[x=I[a=\n       1234567],\n  y=1]"
        );
        for width in 16..=30 {
            let pretty = outer.to_pretty_string(width);
            for line in pretty.lines() {
                assert!(line.chars().count() <= width, "{line:?} exceeds {width}");
            }
        }
    }

    #[test]
    fn closing_brackets_count_against_the_width() {
        let vec = Value::from(vec![
            Value::from(1),
            Value::from(vec![Value::from("ab"), Value::from("cd")]),
        ]);
        // The inner vector alone fills the second line; the outer `]` would not.
        assert_eq!(vec.to_pretty_string(13), "[1,\n [\"ab\",\n  \"cd\"]]");
    }
}
