// Museum/Items wiki page parsing
use crate::catalog::WikiSnapshot;
use crate::model::ParserError;
use crate::normalizer::normalize_name;
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub trait Parser {
    fn parse(&self, html: &str) -> Result<WikiSnapshot, ParserError>;
}

/// Extracts museum categories, items and aliases from the wiki's item tables.
///
/// A row holding `th[colspan=3] > b` opens a category. Data rows name the
/// item through the titled link in their second cell; titled links in the
/// third (notes) cell are alternative items that count toward it.
pub struct WikiParser {
    source: String,
}

impl WikiParser {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Parser for WikiParser {
    fn parse(&self, html: &str) -> Result<WikiSnapshot, ParserError> {
        let document = Html::parse_document(html);
        let row_selector = selector("tr")?;
        let header_selector = selector(r#"th[colspan="3"] > b"#)?;
        let link_selector = selector("a[title]")?;

        let mut sections: Vec<Section> = Vec::new();
        let mut aliases = Map::new();

        for row in document.select(&row_selector) {
            if let Some(header) = row.select(&header_selector).next() {
                let name = header.text().collect::<String>().trim().to_string();
                sections.push(Section::new(name));
                continue;
            }
            let Some(section) = sections.last_mut() else {
                continue;
            };
            if child_cells(row, "th").next().is_some() {
                continue;
            }

            let cells: Vec<ElementRef> = child_cells(row, "td").collect();
            if cells.len() < 2 {
                continue;
            }
            let Some(item_name) = first_title(cells[1], &link_selector) else {
                continue;
            };
            let base_key = normalize_name(&item_name);
            section.push(item_name);

            if let Some(notes) = cells.get(2) {
                for link in notes.select(&link_selector) {
                    let Some(alias_name) = link.value().attr("title").map(str::trim) else {
                        continue;
                    };
                    let alias_key = normalize_name(alias_name);
                    if alias_key.is_empty() || base_key.is_empty() || alias_key == base_key {
                        continue;
                    }
                    // First mapping wins, within a section as well as across sections.
                    if !aliases.contains_key(&alias_key) {
                        aliases.insert(alias_key, Value::String(base_key.clone()));
                    }
                }
            }
        }

        let mut categories = Map::new();
        let mut total_items = 0;
        for section in sections.into_iter().filter(|s| !s.items.is_empty()) {
            total_items += section.items.len();
            let items = section.items.into_iter().map(Value::String).collect();
            categories.insert(section.name, Value::Array(items));
        }
        if categories.is_empty() {
            return Err(ParserError::NoTables);
        }

        Ok(WikiSnapshot {
            source: self.source.clone(),
            generated_at: Some(Utc::now().to_rfc3339()),
            category_count: categories.len(),
            total_items,
            categories,
            aliases,
        })
    }
}

struct Section {
    name: String,
    items: Vec<String>,
    seen: HashSet<String>,
}

impl Section {
    fn new(name: String) -> Self {
        Self {
            name,
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// First spelling of each normalized name wins.
    fn push(&mut self, item: String) {
        if self.seen.insert(normalize_name(&item)) {
            self.items.push(item);
        }
    }
}

fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::Selector(e.to_string()))
}

fn child_cells<'a>(row: ElementRef<'a>, tag: &'static str) -> impl Iterator<Item = ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(move |cell| cell.value().name() == tag)
}

fn first_title(cell: ElementRef, link_selector: &Selector) -> Option<String> {
    let title = cell
        .select(link_selector)
        .next()?
        .value()
        .attr("title")?
        .trim();
    (!title.is_empty()).then(|| title.to_string())
}
