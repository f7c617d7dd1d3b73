//! Property path tokenizer.
//!
//! Splits expressions such as `orders[3].item.name` into steps, one segment at a time:
//!
//! ```text
//! path    := segment ('.' segment)*
//! segment := identifier ('[' index ']')?
//! index   := [^\]]*
//! ```
//!
//! Each step borrows from the input, nothing is copied. The tokenizer does not look at types,
//! it only splits text.

/// One step of a property path.
///
/// # Examples
///
/// ```rust
/// use propscope::PropertyTokenizer;
///
/// let step = PropertyTokenizer::new("orders[3].item");
/// assert_eq!(step.name(), "orders");
/// assert_eq!(step.index(), Some("3"));
/// assert_eq!(step.indexed_name(), "orders[3]");
/// assert_eq!(step.children(), Some("item"));
///
/// let next = step.next_step().unwrap();
/// assert_eq!(next.name(), "item");
/// assert!(!next.has_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyTokenizer<'a> {
    name: &'a str,
    indexed_name: &'a str,
    index: Option<&'a str>,
    children: Option<&'a str>,
}

impl<'a> PropertyTokenizer<'a> {
    /// Parse the first step of `path`.
    ///
    /// The head is everything before the first `.`. A `[` in the head starts the index, which
    /// runs up to the closing `]`; when the bracket is never closed the rest of the head is the
    /// index.
    pub fn new(path: &'a str) -> Self {
        let (head, children) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        let (name, index) = match head.split_once('[') {
            Some((name, rest)) => (name, Some(rest.strip_suffix(']').unwrap_or(rest))),
            None => (head, None),
        };

        PropertyTokenizer {
            name,
            indexed_name: head,
            index,
            children,
        }
    }

    /// Segment name without the bracket suffix
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Segment including its bracket suffix, e.g. `orders[3]`
    pub fn indexed_name(&self) -> &'a str {
        self.indexed_name
    }

    /// Raw index text between the brackets
    pub fn index(&self) -> Option<&'a str> {
        self.index
    }

    /// Unconsumed remainder after the first `.`
    pub fn children(&self) -> Option<&'a str> {
        self.children
    }

    /// Returns true if another step follows
    pub fn has_next(&self) -> bool {
        self.children.is_some()
    }

    /// Parse the step after this one
    pub fn next_step(&self) -> Option<PropertyTokenizer<'a>> {
        self.children.map(PropertyTokenizer::new)
    }

    /// Iterate over this step and all that follow
    pub fn steps(self) -> Steps<'a> {
        Steps {
            current: Some(self),
        }
    }
}

/// Iterator over the steps of a path, produced lazily
#[derive(Debug, Clone)]
pub struct Steps<'a> {
    current: Option<PropertyTokenizer<'a>>,
}

impl<'a> Iterator for Steps<'a> {
    type Item = PropertyTokenizer<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.current.take()?;
        self.current = step.next_step();
        Some(step)
    }
}
