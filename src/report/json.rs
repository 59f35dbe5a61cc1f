use crate::report::BoardView;
use serde_json::json;

pub fn to_json(view: &BoardView) -> Result<String, serde_json::Error> {
    let document = json!({
        "title": view.title,
        "generated_at": view.generated_at.to_rfc3339(),
        "teams": view.rows.as_ref(),
    });
    serde_json::to_string_pretty(&document)
}
