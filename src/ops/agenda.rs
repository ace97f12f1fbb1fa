use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::model::{DateField, Item, Outline};

/// How far ahead the agenda view looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgendaSpan {
    Today,
    Week,
    All,
}

impl AgendaSpan {
    pub fn label(self) -> &'static str {
        match self {
            AgendaSpan::Today => "today",
            AgendaSpan::Week => "week",
            AgendaSpan::All => "all",
        }
    }
}

/// One dated row of the agenda view.
#[derive(Debug, Clone, PartialEq)]
pub struct AgendaEntry {
    pub item_id: String,
    pub title: String,
    pub status: String,
    pub field: DateField,
    pub when: NaiveDateTime,
}

/// Collect due/scheduled entries inside the span, ordered by time then id.
/// An item carrying both dates contributes one row per date.
pub fn agenda_entries(outline: &Outline, span: AgendaSpan, today: NaiveDate) -> Vec<AgendaEntry> {
    let mut entries = Vec::new();
    collect(&outline.items, &mut entries);

    let cutoff = match span {
        AgendaSpan::Today => Some(today + Duration::days(1)),
        AgendaSpan::Week => Some(today + Duration::days(7)),
        AgendaSpan::All => None,
    };
    if let Some(cutoff) = cutoff {
        let cutoff = cutoff.and_time(chrono::NaiveTime::MIN);
        entries.retain(|e| e.when < cutoff);
    }

    entries.sort_by(|a, b| a.when.cmp(&b.when).then_with(|| a.item_id.cmp(&b.item_id)));
    entries
}

fn collect(items: &[Item], entries: &mut Vec<AgendaEntry>) {
    for item in items {
        for (field, when) in [(DateField::Due, item.due), (DateField::Scheduled, item.scheduled)] {
            if let Some(when) = when {
                entries.push(AgendaEntry {
                    item_id: item.id.clone(),
                    title: item.title.clone(),
                    status: item.status.clone(),
                    field,
                    when,
                });
            }
        }
        collect(&item.children, entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn dated_outline() -> Outline {
        let mut outline = Outline::new("out-1", "Agenda");
        let mut a = Item::new("a", "Soon", "todo");
        a.due = Some(at("2026-03-02"));
        let mut b = Item::new("b", "Later", "todo");
        b.scheduled = Some(at("2026-03-10"));
        let mut c = Item::new("c", "Both", "todo");
        c.due = Some(at("2026-03-01"));
        c.scheduled = Some(at("2026-03-04"));
        a.children.push(c);
        outline.items.push(a);
        outline.items.push(b);
        outline
    }

    #[test]
    fn entries_are_time_ordered_across_depths() {
        let today = NaiveDate::parse_from_str("2026-03-01", "%Y-%m-%d").unwrap();
        let entries = agenda_entries(&dated_outline(), AgendaSpan::All, today);
        let ids: Vec<&str> = entries.iter().map(|e| e.item_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "c", "b"]);
    }

    #[test]
    fn span_limits_the_horizon() {
        let today = NaiveDate::parse_from_str("2026-03-01", "%Y-%m-%d").unwrap();
        let today_only = agenda_entries(&dated_outline(), AgendaSpan::Today, today);
        assert_eq!(today_only.len(), 1);
        assert_eq!(today_only[0].item_id, "c");

        let week = agenda_entries(&dated_outline(), AgendaSpan::Week, today);
        assert_eq!(week.len(), 3);
    }
}
