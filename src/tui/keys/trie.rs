//! Prefix tree over key sequences
//!
//! Maps an ordered sequence of tokens to a value. Besides exact lookup it
//! answers whether a sequence is still a valid prefix, which is what lets
//! the input resolver keep buffering keystrokes.

/// One node of a [`KeySequenceTrie`]
///
/// A node is a leaf iff it carries a value. Leaves may still have
/// children, so a short and a long binding can share a prefix.
#[derive(Debug, Clone)]
struct Node<K, V> {
    token: Option<K>,
    value: Option<V>,
    children: Vec<Node<K, V>>,
}

impl<K: PartialEq, V> Node<K, V> {
    fn root() -> Self {
        Self {
            token: None,
            value: None,
            children: Vec::new(),
        }
    }

    fn child(&self, token: &K) -> Option<&Node<K, V>> {
        self.children
            .iter()
            .find(|c| c.token.as_ref() == Some(token))
    }
}

/// A trie keyed by token sequences
#[derive(Debug, Clone)]
pub struct KeySequenceTrie<K, V> {
    root: Node<K, V>,
}

impl<K: PartialEq + Clone, V> KeySequenceTrie<K, V> {
    /// Create an empty trie
    pub fn new() -> Self {
        Self { root: Node::root() }
    }

    /// Bind `path` to `value`, creating intermediate nodes as needed
    ///
    /// Binding a path that is currently an internal node turns it into a
    /// leaf and keeps its children. Binding an existing leaf replaces its
    /// value. Returns `false` only for an empty path, which is never stored.
    pub fn insert(&mut self, path: &[K], value: V) -> bool {
        if path.is_empty() {
            return false;
        }

        let mut node = &mut self.root;
        for token in path {
            let index = match node.children.iter().position(|c| c.token.as_ref() == Some(token)) {
                Some(index) => index,
                None => {
                    node.children.push(Node {
                        token: Some(token.clone()),
                        value: None,
                        children: Vec::new(),
                    });
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }

        node.value = Some(value);
        true
    }

    /// Exact lookup; internal nodes without a value are not found
    pub fn get(&self, path: &[K]) -> Option<&V> {
        if path.is_empty() {
            return None;
        }
        self.node(path).and_then(|n| n.value.as_ref())
    }

    /// Whether `path` is a prefix of at least one bound sequence
    ///
    /// A bound sequence counts as a prefix of itself.
    pub fn contains_path(&self, path: &[K]) -> bool {
        if path.is_empty() {
            return !self.is_empty();
        }
        self.node(path).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Every bound sequence with its value, depth first
    pub fn entries(&self) -> Vec<(Vec<K>, &V)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        collect(&self.root, &mut path, &mut out);
        out
    }

    fn node(&self, path: &[K]) -> Option<&Node<K, V>> {
        let mut node = &self.root;
        for token in path {
            node = node.child(token)?;
        }
        Some(node)
    }
}

fn collect<'a, K: Clone, V>(node: &'a Node<K, V>, path: &mut Vec<K>, out: &mut Vec<(Vec<K>, &'a V)>) {
    if let Some(value) = node.value.as_ref() {
        out.push((path.clone(), value));
    }
    for child in node.children.iter() {
        if let Some(token) = child.token.as_ref() {
            path.push(token.clone());
            collect(child, path, out);
            path.pop();
        }
    }
}

impl<K: PartialEq + Clone, V> Default for KeySequenceTrie<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
