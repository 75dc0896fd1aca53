use std::collections::HashMap;

/// Turn a feed title into an HTML element id.
///
/// Drops every character that is neither alphanumeric nor whitespace, then
/// replaces each whitespace run with a single `_`. May return `""`.
///
/// ```
/// use tagwatch::report::sanitize_id;
///
/// assert_eq!(sanitize_id("Krebs on Security"), "Krebs_on_Security");
/// assert_eq!(sanitize_id("Schneier on Security: Blog!"), "Schneier_on_Security_Blog");
/// ```
pub fn sanitize_id(title: &str) -> String {
    let mut id = String::with_capacity(title.len());
    let mut in_space = false;

    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                id.push('_');
                in_space = true;
            }
        } else if c.is_alphanumeric() {
            id.push(c);
            in_space = false;
        }
    }

    id
}

/// Hands out section ids that are unique within one report.
///
/// The first title to sanitize to a given id gets it unchanged; repeats get
/// `-2`, `-3`, ... appended. A title that sanitizes to nothing uses `feed`.
/// Suffixed ids cannot collide with plain ones since `-` never survives
/// [`sanitize_id`].
#[derive(Debug, Default)]
pub struct IdAllocator {
    seen: HashMap<String, usize>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, title: &str) -> String {
        let mut base = sanitize_id(title);
        if base.is_empty() {
            base = "feed".to_string();
        }

        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            base
        } else {
            format!("{}-{}", base, count)
        }
    }
}
