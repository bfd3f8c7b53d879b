//! Text rendering of the resolved configuration.

use crate::registry::Registry;


/// Shown instead of the value of any option marked secret.
pub const SECRET_PLACEHOLDER: &str = "<secret>";

const HEADERS: [&str; 5] = ["NAME", "TYPE", "VALUE", "SOURCE", "DESCRIPTION"];


struct Row {
    cells: [String; 5],
}


/// Renders every option as an aligned table sorted by path name.
///
/// Secret values are replaced by [`SECRET_PLACEHOLDER`] as a whole.
pub fn show(registry: &Registry) -> String {
    let mut rows = registry
        .nodes()
        .iter()
        .map(|cell| {
            let node = cell.lock();

            let value = if node.is_secret() {
                SECRET_PLACEHOLDER.to_string()
            } else {
                node.value().to_string()
            };

            Row {
                cells: [
                    node.path_name(),
                    node.value().type_name().to_string(),
                    value,
                    node.source().to_string(),
                    node.description().to_string(),
                ],
            }
        })
        .collect::<Vec<_>>();

    rows.sort_by(|first, second| first.cells[0].cmp(&second.cells[0]));


    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_line(&mut output, &HEADERS.map(str::to_string), &widths);
    for row in &rows {
        push_line(&mut output, &row.cells, &widths);
    }

    output
}

fn push_line(output: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}", width = *width))
        .collect::<Vec<_>>()
        .join("  ");

    output.push_str(line.trim_end());
    output.push('\n');
}
