use shared::{domain::MemberId, protocol::Member};

use crate::{selection::SelectionTracker, store::ResourceList};

pub const HEADERS: [&str; 6] = ["", "Name", "Email", "Affiliation", "Site account", "Position"];

const NO_EMAIL: &str = "-";
const DEFAULT_POSITION: &str = "Regular member";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub id: MemberId,
    pub selected: bool,
    pub name: String,
    pub email: String,
    pub affiliation: String,
    pub authority: &'static str,
    pub position: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toolbar {
    pub show_change_position: bool,
    pub show_remove: bool,
}

pub fn authority_label(authority: Option<i64>) -> &'static str {
    match authority {
        Some(_) => "Registered",
        None => "Not registered",
    }
}

pub fn project_rows(
    members: &ResourceList<Member>,
    selection: &SelectionTracker<MemberId>,
) -> Vec<MemberRow> {
    members
        .records()
        .iter()
        .map(|member| MemberRow {
            id: member.id,
            selected: selection.contains(member.id),
            name: member.name.clone(),
            email: non_empty_or(member.email.as_deref(), NO_EMAIL),
            affiliation: member.affiliation.clone(),
            authority: authority_label(member.authority),
            position: non_empty_or(member.note.as_deref(), DEFAULT_POSITION),
        })
        .collect()
}

pub fn toolbar(selection: &SelectionTracker<MemberId>) -> Toolbar {
    Toolbar {
        show_change_position: selection.len() == 1,
        show_remove: !selection.is_empty(),
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => fallback.to_string(),
    }
}

pub fn render_table(rows: &[MemberRow]) -> String {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                if row.selected { "[x]" } else { "[ ]" }.to_string(),
                row.name.clone(),
                row.email.clone(),
                row.affiliation.clone(),
                row.authority.to_string(),
                row.position.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    for line in &cells {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, email: Option<&str>, authority: Option<i64>, note: Option<&str>) -> Member {
        Member {
            id: MemberId(id),
            email: email.map(str::to_string),
            authority,
            name: format!("member-{id}"),
            affiliation: "Acme".to_string(),
            note: note.map(str::to_string),
        }
    }

    #[test]
    fn rows_fill_in_placeholders() {
        let mut members = ResourceList::new();
        members.replace(vec![
            member(1, None, None, None),
            member(2, Some(""), Some(3), Some("")),
            member(3, Some("c@example.com"), Some(1), Some("Chair")),
        ]);
        let mut selection = SelectionTracker::new();
        selection.toggle(MemberId(3));

        let rows = project_rows(&members, &selection);

        assert_eq!(rows[0].email, "-");
        assert_eq!(rows[0].authority, "Not registered");
        assert_eq!(rows[0].position, "Regular member");
        assert_eq!(rows[1].email, "-");
        assert_eq!(rows[1].authority, "Registered");
        assert_eq!(rows[1].position, "Regular member");
        assert_eq!(rows[2].email, "c@example.com");
        assert_eq!(rows[2].position, "Chair");
        assert!(rows[2].selected);
        assert!(!rows[0].selected);
    }

    #[test]
    fn toolbar_tracks_selection_size() {
        let mut selection = SelectionTracker::new();
        assert_eq!(
            toolbar(&selection),
            Toolbar {
                show_change_position: false,
                show_remove: false
            }
        );

        selection.toggle(MemberId(1));
        assert_eq!(
            toolbar(&selection),
            Toolbar {
                show_change_position: true,
                show_remove: true
            }
        );

        selection.toggle(MemberId(2));
        assert_eq!(
            toolbar(&selection),
            Toolbar {
                show_change_position: false,
                show_remove: true
            }
        );
    }

    #[test]
    fn table_has_header_and_one_line_per_row() {
        let mut members = ResourceList::new();
        members.replace(vec![member(1, None, None, Some("Chair"))]);
        let rendered = render_table(&project_rows(&members, &SelectionTracker::new()));

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Name"));
        assert!(lines[1].starts_with("[ ]"));
        assert!(lines[1].contains("member-1"));
        assert!(lines[1].ends_with("Chair"));
    }
}
