//! The document tree the emitter can walk directly.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use hashlink::LinkedHashMap;

use crate::token::{Comments, ScalarToken};

/// A resolved YAML tag, split at its directive handle.
///
/// `handle` is the handle as written (`!`, `!!` or a named `!h!` handle); an
/// empty handle selects the verbatim `!<...>` form on output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag<'input> {
    /// The directive handle the tag was written with.
    pub handle: Cow<'input, str>,
    /// The part after the handle.
    pub suffix: Cow<'input, str>,
}

impl<'input> Tag<'input> {
    /// Build a tag from a handle and a suffix.
    #[must_use]
    pub fn new(handle: impl Into<Cow<'input, str>>, suffix: impl Into<Cow<'input, str>>) -> Self {
        Self {
            handle: handle.into(),
            suffix: suffix.into(),
        }
    }

    /// Whether the tag belongs to the YAML core schema (`!!` handle).
    #[must_use]
    pub fn is_core_schema(&self) -> bool {
        self.handle == "!!"
    }
}

/// A `%TAG` directive of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDirective<'input> {
    /// The handle, e.g. `!e!`.
    pub handle: Cow<'input, str>,
    /// The prefix the handle expands to.
    pub prefix: Cow<'input, str>,
}

impl<'input> TagDirective<'input> {
    /// Build a tag directive.
    #[must_use]
    pub fn new(handle: impl Into<Cow<'input, str>>, prefix: impl Into<Cow<'input, str>>) -> Self {
        Self {
            handle: handle.into(),
            prefix: prefix.into(),
        }
    }

    /// Whether this is one of the two default directives (`!` and `!!`),
    /// which are never written out.
    #[must_use]
    pub fn is_default(&self) -> bool {
        (self.handle == "!" && self.prefix == "!")
            || (self.handle == "!!" && self.prefix == "tag:yaml.org,2002:")
    }
}

/// The presentation details of a document: directives and mark implicitness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState<'input> {
    /// The explicit `%YAML` version, if any.
    pub version: Option<(u32, u32)>,
    /// The explicit `%TAG` directives.
    pub tags: Vec<TagDirective<'input>>,
    /// Whether the document started without a `---` mark.
    pub start_implicit: bool,
    /// Whether the document ended without a `...` mark.
    pub end_implicit: bool,
}

impl Default for DocumentState<'_> {
    fn default() -> Self {
        Self {
            version: None,
            tags: Vec::new(),
            start_implicit: true,
            end_implicit: true,
        }
    }
}

/// A document: its presentation state and an optional root node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document<'input> {
    /// Directives and mark implicitness.
    pub state: DocumentState<'input>,
    /// The root node; `None` for an empty document.
    pub root: Option<Node<'input>>,
}

impl<'input> Document<'input> {
    /// Build a document around a root node, with default presentation.
    #[must_use]
    pub fn new(root: Node<'input>) -> Self {
        Self {
            state: DocumentState::default(),
            root: Some(root),
        }
    }
}

/// The type backing [`MappingNode`]: an insertion-ordered map.
pub type Mapping<'input> = LinkedHashMap<Node<'input>, Node<'input>>;

/// A scalar node.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarNode<'input> {
    /// The scalar token.
    pub token: ScalarToken<'input>,
    /// Optional anchor name (without the `&`).
    pub anchor: Option<Cow<'input, str>>,
    /// Optional tag.
    pub tag: Option<Tag<'input>>,
}

/// An alias node, referring to an anchor elsewhere in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasNode<'input> {
    /// The anchor name (without the `*`).
    pub anchor: Cow<'input, str>,
}

/// A sequence node.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceNode<'input> {
    /// The items, in order.
    pub items: Vec<Node<'input>>,
    /// Whether the sequence was written in flow style.
    pub flow: bool,
    /// Optional anchor name.
    pub anchor: Option<Cow<'input, str>>,
    /// Optional tag.
    pub tag: Option<Tag<'input>>,
    /// Comments attached to the sequence itself.
    pub comments: Comments<'input>,
}

/// A mapping node.
#[derive(Debug, Clone)]
pub struct MappingNode<'input> {
    /// The key/value pairs, in insertion order.
    pub pairs: Mapping<'input>,
    /// Whether the mapping was written in flow style.
    pub flow: bool,
    /// Optional anchor name.
    pub anchor: Option<Cow<'input, str>>,
    /// Optional tag.
    pub tag: Option<Tag<'input>>,
    /// Comments attached to the mapping itself.
    pub comments: Comments<'input>,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'input> {
    /// A scalar leaf.
    Scalar(ScalarNode<'input>),
    /// A sequence of nodes.
    Sequence(SequenceNode<'input>),
    /// A mapping of nodes to nodes.
    Mapping(MappingNode<'input>),
    /// An alias referring to an anchored node.
    Alias(AliasNode<'input>),
}

impl<'input> Node<'input> {
    /// Build a scalar node from a token.
    #[must_use]
    pub fn scalar(token: ScalarToken<'input>) -> Self {
        Self::Scalar(ScalarNode {
            token,
            anchor: None,
            tag: None,
        })
    }

    /// Build a block sequence node from items.
    #[must_use]
    pub fn sequence(items: Vec<Node<'input>>) -> Self {
        Self::Sequence(SequenceNode {
            items,
            flow: false,
            anchor: None,
            tag: None,
            comments: Comments::default(),
        })
    }

    /// Build a block mapping node from key/value pairs.
    ///
    /// Later duplicates of a key replace earlier ones, as in any map.
    #[must_use]
    pub fn mapping(pairs: impl IntoIterator<Item = (Node<'input>, Node<'input>)>) -> Self {
        Self::Mapping(MappingNode {
            pairs: pairs.into_iter().collect(),
            flow: false,
            anchor: None,
            tag: None,
            comments: Comments::default(),
        })
    }

    /// Build an alias node.
    #[must_use]
    pub fn alias(anchor: impl Into<Cow<'input, str>>) -> Self {
        Self::Alias(AliasNode {
            anchor: anchor.into(),
        })
    }

    /// Mark a container node as flow style. No-op for scalars and aliases.
    #[must_use]
    pub fn into_flow(mut self) -> Self {
        match &mut self {
            Self::Sequence(s) => s.flow = true,
            Self::Mapping(m) => m.flow = true,
            Self::Scalar(_) | Self::Alias(_) => {}
        }
        self
    }

    /// Set the anchor of the node. No-op for aliases.
    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<Cow<'input, str>>) -> Self {
        let anchor = anchor.into();
        match &mut self {
            Self::Scalar(s) => s.anchor = Some(anchor),
            Self::Sequence(s) => s.anchor = Some(anchor),
            Self::Mapping(m) => m.anchor = Some(anchor),
            Self::Alias(_) => {}
        }
        self
    }

    /// Set the tag of the node. No-op for aliases.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag<'input>) -> Self {
        match &mut self {
            Self::Scalar(s) => s.tag = Some(tag),
            Self::Sequence(s) => s.tag = Some(tag),
            Self::Mapping(m) => m.tag = Some(tag),
            Self::Alias(_) => {}
        }
        self
    }

    /// Attach comments to the node. No-op for aliases.
    #[must_use]
    pub fn with_comments(mut self, comments: Comments<'input>) -> Self {
        match &mut self {
            Self::Scalar(s) => s.token = std::mem::take(&mut s.token).with_comments(comments),
            Self::Sequence(s) => s.comments = comments,
            Self::Mapping(m) => m.comments = comments,
            Self::Alias(_) => {}
        }
        self
    }

    /// The anchor of the node, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => s.anchor.as_deref(),
            Self::Sequence(s) => s.anchor.as_deref(),
            Self::Mapping(m) => m.anchor.as_deref(),
            Self::Alias(_) => None,
        }
    }

    /// The tag of the node, if any.
    #[must_use]
    pub fn tag(&self) -> Option<&Tag<'input>> {
        match self {
            Self::Scalar(s) => s.tag.as_ref(),
            Self::Sequence(s) => s.tag.as_ref(),
            Self::Mapping(m) => m.tag.as_ref(),
            Self::Alias(_) => None,
        }
    }

    /// The comments of the node, if it can carry any.
    #[must_use]
    pub fn comments(&self) -> Option<&Comments<'input>> {
        match self {
            Self::Scalar(s) => Some(s.token.comments()),
            Self::Sequence(s) => Some(&s.comments),
            Self::Mapping(m) => Some(&m.comments),
            Self::Alias(_) => None,
        }
    }
}

impl PartialEq for MappingNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.pairs.len() == other.pairs.len()
            && self
                .pairs
                .iter()
                .zip(other.pairs.iter())
                .all(|(a, b)| a == b)
    }
}

impl Eq for ScalarNode<'_> {}
impl Eq for SequenceNode<'_> {}
impl Eq for MappingNode<'_> {}
impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Scalar(s) => s.token.hash(state),
            Self::Sequence(s) => {
                for item in &s.items {
                    item.hash(state);
                }
            }
            Self::Mapping(m) => {
                for (k, v) in &m.pairs {
                    k.hash(state);
                    v.hash(state);
                }
            }
            Self::Alias(a) => a.anchor.hash(state),
        }
    }
}

/// Rank of a node kind for key sorting: scalars, then aliases, then
/// sequences, then mappings.
fn sort_rank(node: &Node<'_>) -> u8 {
    match node {
        Node::Scalar(_) => 0,
        Node::Alias(_) => 1,
        Node::Sequence(_) => 2,
        Node::Mapping(_) => 3,
    }
}

/// The comparator behind [`MappingNode::sorted_pairs`]: scalar keys by
/// logical text, non-scalar keys after them by kind.
pub(crate) fn sort_key_cmp(a: &Node<'_>, b: &Node<'_>) -> Ordering {
    match (a, b) {
        (Node::Scalar(x), Node::Scalar(y)) => x.token.text().ok().cmp(&y.token.text().ok()),
        (Node::Alias(x), Node::Alias(y)) => x.anchor.cmp(&y.anchor),
        _ => sort_rank(a).cmp(&sort_rank(b)),
    }
}

impl<'input> MappingNode<'input> {
    /// The pairs ordered for `sort_keys` emission.
    ///
    /// The sort is stable: pairs whose keys compare equal keep their
    /// insertion order, which makes sorted emission deterministic.
    #[must_use]
    pub fn sorted_pairs(&self) -> Vec<(&Node<'input>, &Node<'input>)> {
        let mut pairs: Vec<_> = self.pairs.iter().collect();
        pairs.sort_by(|a, b| sort_key_cmp(a.0, b.0));
        pairs
    }
}

#[cfg(test)]
mod test {
    use super::Node;
    use crate::{ScalarStyle, ScalarToken};

    fn scalar(text: &str) -> Node<'_> {
        Node::scalar(ScalarToken::new(text, ScalarStyle::Plain))
    }

    #[test]
    fn mapping_preserves_insertion_order() {
        let node = Node::mapping([
            (scalar("b"), scalar("1")),
            (scalar("a"), scalar("2")),
        ]);
        let Node::Mapping(m) = &node else { panic!() };
        let keys: Vec<_> = m
            .pairs
            .keys()
            .map(|k| match k {
                Node::Scalar(s) => s.token.text().unwrap().into_owned(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn sorted_pairs_order_keys_by_text() {
        let node = Node::mapping([
            (scalar("b"), scalar("1")),
            (scalar("a"), scalar("2")),
            (Node::sequence(vec![]), scalar("3")),
        ]);
        let Node::Mapping(m) = &node else { panic!() };
        let sorted = m.sorted_pairs();
        assert!(matches!(sorted[0].0, Node::Scalar(s) if s.token.text().unwrap() == "a"));
        assert!(matches!(sorted[1].0, Node::Scalar(s) if s.token.text().unwrap() == "b"));
        assert!(matches!(sorted[2].0, Node::Sequence(_)));
    }
}
