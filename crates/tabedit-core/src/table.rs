//! Core table types shared by every encoding

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An in-memory table: an ordered sequence of rows
///
/// Rows may have different lengths. Serializes as a plain list of lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    /// Row data
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table from its rows
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the width of the widest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell by row and column index
    pub fn get(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Get a mutable cell by row and column index
    pub fn get_mut(&mut self, row: usize, column: usize) -> Option<&mut CellValue> {
        self.rows.get_mut(row).and_then(|r| r.cells.get_mut(column))
    }
}

impl<R: Into<Row>> FromIterator<R> for Table {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Renders one comma-joined line per row
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// A row of data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<C: Into<CellValue>> FromIterator<C> for Row {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl<C: Into<CellValue>> From<Vec<C>> for Row {
    fn from(cells: Vec<C>) -> Self {
        cells.into_iter().collect()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", cell)?;
        }
        Ok(())
    }
}

/// A scalar cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// Boolean value (JSON and pickle only)
    Boolean(bool),
    /// String value
    String(String),
    /// Empty/null cell
    Empty,
}

impl CellValue {
    /// Parse text into a CellValue, detecting the type
    ///
    /// Used for edit values. Detection is canonical: text only becomes a number
    /// when formatting that number gives back the exact same text, so `"007"`,
    /// `"+5"` and `"1.50"` stay strings. Non-finite floats (`NaN`, `inf`) stay
    /// strings too. Surrounding whitespace is kept.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Empty;
        }

        if let Ok(i) = s.parse::<i64>() {
            if i.to_string() == s {
                return CellValue::Integer(i);
            }
        }

        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() && format_float(f) == s {
                return CellValue::Float(f);
            }
        }

        CellValue::String(s.to_string())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Convert to the text form used for CSV fields and console output
    pub fn to_string_value(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => format_float(*f),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

// Debug formatting always keeps a decimal point or exponent, so a float written
// as text is never read back as an integer.
fn format_float(f: f64) -> String {
    format!("{:?}", f)
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(fl) => write!(f, "{}", format_float(*fl)),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Empty => write!(f, ""),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(f) => serializer.serialize_f64(*f),
            CellValue::Boolean(b) => serializer.serialize_bool(*b),
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Empty => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellVisitor)
    }
}

/// Accepts scalars only; sequences and maps fall through to serde's
/// invalid-type error.
struct CellVisitor;

impl<'de> Visitor<'de> for CellVisitor {
    type Value = CellValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar cell (string, number, boolean or null)")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<CellValue, E> {
        Ok(CellValue::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CellValue, E> {
        Ok(CellValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CellValue, E> {
        i64::try_from(v)
            .map(CellValue::Integer)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &"an integer within i64 range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<CellValue, E> {
        Ok(CellValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CellValue, E> {
        Ok(CellValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<CellValue, E> {
        Ok(CellValue::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<CellValue, E> {
        match std::str::from_utf8(v) {
            Ok(s) => Ok(CellValue::String(s.to_string())),
            Err(_) => Err(E::invalid_value(Unexpected::Bytes(v), &self)),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Empty)
    }

    fn visit_none<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_parse_integer() {
        assert_eq!(CellValue::parse("42"), CellValue::Integer(42));
        assert_eq!(CellValue::parse("-123"), CellValue::Integer(-123));
        assert_eq!(CellValue::parse("0"), CellValue::Integer(0));
    }

    #[test]
    fn test_cell_value_parse_float() {
        assert_eq!(CellValue::parse("3.25"), CellValue::Float(3.25));
        assert_eq!(CellValue::parse("-2.5"), CellValue::Float(-2.5));
        assert_eq!(CellValue::parse("1.0"), CellValue::Float(1.0));
    }

    #[test]
    fn test_cell_value_parse_non_canonical_numbers_stay_strings() {
        assert_eq!(CellValue::parse("007"), CellValue::String("007".to_string()));
        assert_eq!(CellValue::parse("+5"), CellValue::String("+5".to_string()));
        assert_eq!(CellValue::parse("1.50"), CellValue::String("1.50".to_string()));
        assert_eq!(CellValue::parse(" 1"), CellValue::String(" 1".to_string()));
    }

    #[test]
    fn test_cell_value_parse_non_finite_stays_string() {
        for text in ["NaN", "inf", "-inf"] {
            assert_eq!(CellValue::parse(text), CellValue::String(text.to_string()));
        }
    }

    #[test]
    fn test_cell_value_parse_string() {
        assert_eq!(
            CellValue::parse("hello"),
            CellValue::String("hello".to_string())
        );
        assert_eq!(
            CellValue::parse("0xABCD"),
            CellValue::String("0xABCD".to_string())
        );
        assert_eq!(CellValue::parse("true"), CellValue::String("true".to_string()));
    }

    #[test]
    fn test_cell_value_parse_empty() {
        assert_eq!(CellValue::parse(""), CellValue::Empty);
    }

    #[test]
    fn test_float_text_round_trips() {
        for f in [1.0, 0.1, -2.5, 1e20, 1e-7] {
            let text = CellValue::Float(f).to_string_value();
            assert_eq!(CellValue::parse(&text), CellValue::Float(f), "{text}");
        }
    }

    #[test]
    fn test_cell_value_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Integer(0).is_empty());
        assert!(!CellValue::String("".to_string()).is_empty());
    }

    #[test]
    fn test_table_display() {
        let table: Table = vec![
            Row::from(vec![CellValue::from("x"), CellValue::from(1)]),
            Row::from(vec![CellValue::Empty, CellValue::from(2.5)]),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.to_string(), "x,1\n,2.5");
    }

    #[test]
    fn test_table_dimensions_with_ragged_rows() {
        let table: Table = vec![vec!["a"], vec!["b", "c", "d"], vec![]]
            .into_iter()
            .collect();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.get(1, 2), Some(&CellValue::from("d")));
        assert_eq!(table.get(0, 1), None);
        assert_eq!(table.get(3, 0), None);
    }

    #[test]
    fn test_cell_serde_scalars() {
        let row: Row = serde_json::from_str(r#"["a", 1, -2, 2.5, true, null]"#).unwrap();
        assert_eq!(
            row.cells,
            vec![
                CellValue::from("a"),
                CellValue::Integer(1),
                CellValue::Integer(-2),
                CellValue::Float(2.5),
                CellValue::Boolean(true),
                CellValue::Empty,
            ]
        );
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"["a",1,-2,2.5,true,null]"#
        );
    }

    #[test]
    fn test_cell_rejects_nested_values() {
        assert!(serde_json::from_str::<Row>(r#"[[1, 2]]"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"[{"a": 1}]"#).is_err());
    }

    #[test]
    fn test_cell_rejects_unsigned_overflow() {
        assert!(serde_json::from_str::<Row>("[18446744073709551615]").is_err());
    }
}
