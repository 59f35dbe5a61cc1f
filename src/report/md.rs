use crate::report::BoardView;

pub fn to_markdown(view: &BoardView) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", view.title));
    output.push_str(&format!(
        "Updated: {}\n\n",
        view.generated_at.to_rfc3339()
    ));

    if view.rows.is_empty() {
        output.push_str("- no ratings yet\n");
        return output;
    }

    output.push_str("| Team Name |");
    for id in &view.visible_criteria {
        output.push_str(&format!(" Criteria {id} |"));
    }
    output.push_str(" Average Score |\n|---|");
    for _ in &view.visible_criteria {
        output.push_str("---:|");
    }
    output.push_str("---:|\n");

    for row in view.rows.iter() {
        output.push_str(&format!("| {} |", escape_cell(&row.name)));
        for id in &view.visible_criteria {
            output.push_str(&format!(" {} |", row.criterion(*id)));
        }
        output.push_str(&format!(" {} |\n", row.average()));
    }

    output
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
