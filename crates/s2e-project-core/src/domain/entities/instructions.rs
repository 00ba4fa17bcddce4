use std::fmt;

/// Next-step hints shown to the user after a project is created.
///
/// Sections are separated by a single blank line. Empty sections are
/// dropped so an optional section never leaves a stray gap behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instructions {
    sections: Vec<String>,
}

impl Instructions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(mut self, text: impl Into<String>) -> Self {
        self.push(text);
        self
    }

    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.sections.push(text);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn render(&self) -> String {
        self.sections.join("\n\n")
    }
}

impl fmt::Display for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_joined_by_blank_line() {
        let text = Instructions::new().section("intro").section("seeds").render();
        assert_eq!(text, "intro\n\nseeds");
    }

    #[test]
    fn empty_sections_are_omitted() {
        let text = Instructions::new()
            .section("intro")
            .section("")
            .section("outro")
            .render();
        assert_eq!(text, "intro\n\noutro");
        assert!(!text.contains("\n\n\n"));
    }

    #[test]
    fn empty_renders_to_empty_string() {
        let inst = Instructions::new().section("");
        assert!(inst.is_empty());
        assert_eq!(inst.render(), "");
    }
}
