// src/dataset/json.rs
use serde_json::{Map, Number, Value as Json};

use super::{Dataset, Value};

/// Render rows as JSON objects: numbers stay numeric, missing cells become `""`.
pub fn to_json_records(dataset: &Dataset) -> Json {
    let records = dataset
        .rows
        .iter()
        .map(|row| {
            let mut obj = Map::with_capacity(dataset.width());
            for field in &dataset.schema {
                let cell = match row.get(field) {
                    None | Some(Value::Null) => Json::String(String::new()),
                    Some(Value::Int(i)) => Json::Number((*i).into()),
                    Some(Value::Float(f)) => Number::from_f64(*f)
                        .map(Json::Number)
                        .unwrap_or_else(|| Json::String(f.to_string())),
                    Some(Value::Text(s)) => Json::String(s.clone()),
                };
                obj.insert(field.clone(), cell);
            }
            Json::Object(obj)
        })
        .collect();
    Json::Array(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::row;
    use serde_json::json;

    #[test]
    fn numbers_and_blanks() {
        let ds = Dataset::new(
            vec!["FIPS".into(), "County".into(), "X".into(), "Y".into()],
            vec![row([
                ("FIPS", Value::from("01001")),
                ("County", Value::from("Autauga")),
                ("X", Value::Float(10.5)),
            ])],
        );
        assert_eq!(
            to_json_records(&ds),
            json!([{ "FIPS": "01001", "County": "Autauga", "X": 10.5, "Y": "" }])
        );
    }
}
