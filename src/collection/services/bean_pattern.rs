use glob::{MatchOptions, Pattern, PatternError};

/// Segment some WebLogic releases move to the front of PIA bean names
const RELOCATED_SEGMENT: &str = "ServerRuntime=PIA,";
/// A segment starting before this byte offset counts as "moved to the front"
const LEADING_WINDOW: usize = 12;
/// Where the segment lands when moved: right after the `com.bea:` domain
const RELOCATION_OFFSET: usize = 8;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Glob matcher for bean names, tolerant of the PIA segment reordering
/// between backend versions.
#[derive(Debug, Clone)]
pub struct BeanPattern {
    primary: Pattern,
    relocated: Option<Pattern>,
    pattern_leads: bool,
}

impl BeanPattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let relocated = relocate_segment(pattern)
            .map(|alt| Pattern::new(&alt))
            .transpose()?;
        Ok(Self {
            primary: Pattern::new(pattern)?,
            relocated,
            pattern_leads: leads_with_segment(pattern),
        })
    }

    pub fn as_str(&self) -> &str {
        self.primary.as_str()
    }

    pub fn matches(&self, bean_name: &str) -> bool {
        if self.primary.matches_with(bean_name, MATCH_OPTIONS) {
            return true;
        }
        match &self.relocated {
            Some(alt) if self.pattern_leads || leads_with_segment(bean_name) => {
                alt.matches_with(bean_name, MATCH_OPTIONS)
            }
            _ => false,
        }
    }
}

fn leads_with_segment(text: &str) -> bool {
    text.find(RELOCATED_SEGMENT)
        .is_some_and(|idx| idx < LEADING_WINDOW)
}

/// The pattern with every occurrence of the segment removed and a single
/// copy inserted at the fixed offset. `None` when the pattern lacks the
/// segment or relocation would not change it.
fn relocate_segment(pattern: &str) -> Option<String> {
    if !pattern.contains(RELOCATED_SEGMENT) {
        return None;
    }
    let stripped = pattern.replace(RELOCATED_SEGMENT, "");
    if stripped.len() < RELOCATION_OFFSET || !stripped.is_char_boundary(RELOCATION_OFFSET) {
        return None;
    }
    let relocated = format!(
        "{}{}{}",
        &stripped[..RELOCATION_OFFSET],
        RELOCATED_SEGMENT,
        &stripped[RELOCATION_OFFSET..]
    );
    (relocated != pattern).then_some(relocated)
}
