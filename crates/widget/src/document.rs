//! Thin adapter over the hosting document.
//!
//! The widget only ever appends its structure once and then patches named
//! regions in place. A region the host has removed is skipped, never an
//! error.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Root,
    Toggle,
    Panel,
    Header,
    Stats,
    Duration,
    Timeline,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Root,
        Region::Toggle,
        Region::Panel,
        Region::Header,
        Region::Stats,
        Region::Duration,
        Region::Timeline,
    ];

    /// Element id the region is rendered with.
    pub fn id(self) -> &'static str {
        match self {
            Region::Root => "session-timeline",
            Region::Toggle => "st-toggle",
            Region::Panel => "st-panel",
            Region::Header => "st-header",
            Region::Stats => "st-stats",
            Region::Duration => "st-duration",
            Region::Timeline => "st-events",
        }
    }
}

pub trait Document {
    fn append_to_body(&mut self, markup: &str);

    /// Replace the inner content of `region`. Returns `false` when the region
    /// is not present in the document.
    fn replace_region(&mut self, region: Region, markup: &str) -> bool;

    /// Show or hide `region`. Returns `false` when the region is not present.
    fn set_visible(&mut self, region: Region, visible: bool) -> bool;
}

/// In-memory document that tracks the inner content of every region it has
/// seen in appended or replaced markup.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    body: String,
    regions: HashMap<Region, String>,
    hidden: HashSet<Region>,
    patches: usize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn region(&self, region: Region) -> Option<&str> {
        self.regions.get(&region).map(String::as_str)
    }

    pub fn is_visible(&self, region: Region) -> bool {
        self.regions.contains_key(&region) && !self.hidden.contains(&region)
    }

    /// Number of successful region replacements since creation.
    pub fn patch_count(&self) -> usize {
        self.patches
    }

    /// Remove a region, as a host page script might.
    pub fn detach(&mut self, region: Region) {
        self.regions.remove(&region);
        self.hidden.remove(&region);
    }

    fn register_regions(&mut self, markup: &str) {
        for region in Region::ALL {
            if let Some(inner) = inner_content(markup, region) {
                self.regions.insert(region, inner.to_string());
            }
        }
    }
}

impl Document for MemoryDocument {
    fn append_to_body(&mut self, markup: &str) {
        self.body.push_str(markup);
        self.register_regions(markup);
    }

    fn replace_region(&mut self, region: Region, markup: &str) -> bool {
        if !self.regions.contains_key(&region) {
            return false;
        }
        self.regions.insert(region, markup.to_string());
        self.register_regions(markup);
        self.patches += 1;
        true
    }

    fn set_visible(&mut self, region: Region, visible: bool) -> bool {
        if !self.regions.contains_key(&region) {
            return false;
        }
        if visible {
            self.hidden.remove(&region);
        } else {
            self.hidden.insert(region);
        }
        true
    }
}

/// Inner content of the element carrying `id="<region id>"`, matching nested
/// elements of the same tag.
fn inner_content(markup: &str, region: Region) -> Option<&str> {
    let marker = format!(r#" id="{}""#, region.id());
    let attr_at = markup.find(&marker)?;
    let open_at = markup[..attr_at].rfind('<')?;
    let tag: String = markup[open_at + 1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    let start = attr_at + markup[attr_at..].find('>')? + 1;

    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");
    let mut depth = 1usize;
    let mut cursor = start;
    while depth > 0 {
        let rest = &markup[cursor..];
        let next_close = rest.find(&close_tag)?;
        match rest[..next_close].find(&open_tag) {
            Some(next_open) => {
                depth += 1;
                cursor += next_open + open_tag.len();
            }
            None => {
                depth -= 1;
                if depth == 0 {
                    return Some(&markup[start..cursor + next_close]);
                }
                cursor += next_close + close_tag.len();
            }
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<div id="session-timeline"><div id="st-panel"><section id="st-stats"><span id="st-duration">01m 00s</span></section><ol id="st-events"><li>a</li></ol></div></div>"#;

    #[test]
    fn test_append_registers_nested_regions() {
        let mut doc = MemoryDocument::new();
        doc.append_to_body(PAGE);

        assert_eq!(doc.region(Region::Duration), Some("01m 00s"));
        assert_eq!(doc.region(Region::Timeline), Some("<li>a</li>"));
        assert_eq!(
            doc.region(Region::Panel),
            Some(r#"<section id="st-stats"><span id="st-duration">01m 00s</span></section><ol id="st-events"><li>a</li></ol>"#)
        );
        assert!(doc.region(Region::Header).is_none());
    }

    #[test]
    fn test_replace_reregisters_children() {
        let mut doc = MemoryDocument::new();
        doc.append_to_body(PAGE);

        assert!(doc.replace_region(Region::Stats, r#"<span id="st-duration">02m 00s</span>"#));
        assert_eq!(doc.region(Region::Duration), Some("02m 00s"));
        assert_eq!(doc.patch_count(), 1);
    }

    #[test]
    fn test_missing_region_is_skipped() {
        let mut doc = MemoryDocument::new();
        doc.append_to_body(PAGE);
        doc.detach(Region::Timeline);

        assert!(!doc.replace_region(Region::Timeline, "<li>b</li>"));
        assert!(!doc.set_visible(Region::Timeline, false));
        assert!(!doc.replace_region(Region::Header, "x"));
        assert_eq!(doc.patch_count(), 0);
    }

    #[test]
    fn test_visibility() {
        let mut doc = MemoryDocument::new();
        doc.append_to_body(PAGE);
        assert!(doc.is_visible(Region::Panel));

        assert!(doc.set_visible(Region::Panel, false));
        assert!(!doc.is_visible(Region::Panel));
        assert!(doc.set_visible(Region::Panel, true));
        assert!(doc.is_visible(Region::Panel));
    }
}
