use std::fmt::Write as _;

use quill_common::warning::warn_once;
use quill_dom::{Attributes, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{Attribute, Token};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// Plus the obsolete void elements still found in email markup.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "command", "embed", "frame", "hr", "image",
    "img", "input", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Start tags that close an open `p` element.
///
/// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody):
/// "If the stack of open elements has a p element in button scope, then close
/// a p element."
const CLOSES_P: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "dd",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "li",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "ul",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// Elements that stop the search for an element to implicitly close.
const SCOPE_BOUNDARIES: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A recoverable problem the tree builder worked around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Description of the problem.
    pub message: String,
    /// Index into the token stream where this issue was encountered.
    pub token_index: usize,
}

/// Builds a [`DomTree`] from a token stream without inventing structure.
///
/// This is a much smaller cousin of
/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction):
/// there are no insertion modes, nothing is synthesized (no implied `html`,
/// `head` or `body`) and nothing is reparented, so serializing the tree gives
/// back the input. Only the implied end tags that decide where an element
/// ends are kept:
///
/// - void elements never take children
/// - a self-closing start tag closes the element immediately
/// - `p`, `li`, `dt`/`dd`, `tr`, `td`/`th`, `option` and table sections are
///   closed by the start tags that imply their end
/// - an end tag with no matching open element is ignored
pub struct HTMLParser {
    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack_of_open_elements: Vec<NodeId>,

    /// `NodeId::ROOT` (index 0) is the Document node.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Current position in token stream.
    token_index: usize,

    /// Parse issues encountered during parsing.
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            stack_of_open_elements: Vec::new(),
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            issues: Vec::new(),
        }
    }

    /// Run the parser and return the DOM tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the `DomTree` and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.into_iter().enumerate() {
            self.token_index = index;
            if matches!(token, Token::EndOfFile) {
                break;
            }
            self.process_token(token);
        }
        (self.tree, self.issues)
    }

    fn process_token(&mut self, token: Token) {
        match token {
            Token::Doctype { raw } => self.insert_node(NodeType::Doctype(raw)),
            Token::Comment { data } => self.insert_node(NodeType::Comment(data)),
            Token::Text { data } => self.insert_text(data),
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.handle_start_tag(name, self_closing, attributes),
            Token::EndTag { name } => self.handle_end_tag(&name),
            Token::EndOfFile => {}
        }
    }

    fn handle_start_tag(&mut self, name: String, self_closing: bool, attributes: Vec<Attribute>) {
        self.generate_implied_end_tags(&name);

        let is_void = VOID_ELEMENTS.contains(&name.as_str());
        let element = ElementData {
            tag_name: name,
            attrs: attributes
                .into_iter()
                .map(|attribute| (attribute.name, attribute.value))
                .collect::<Attributes>(),
        };
        let id = self.tree.alloc(NodeType::Element(element));
        self.tree.append_child(self.current_node(), id);

        if !is_void && !self_closing {
            self.stack_of_open_elements.push(id);
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag": walk down the stack looking for an element with the
    /// same tag name and pop up to and including it.
    fn handle_end_tag(&mut self, name: &str) {
        let position = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.tag_name(id) == Some(name));

        match position {
            Some(index) => self.stack_of_open_elements.truncate(index),
            None => self.parse_issue(&format!("unmatched end tag </{name}> ignored")),
        }
    }

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#closing-elements-that-have-implied-end-tags)
    fn generate_implied_end_tags(&mut self, name: &str) {
        if CLOSES_P.contains(&name) {
            self.close_nearest(&["p"], SCOPE_BOUNDARIES);
        }
        match name {
            "li" => self.close_nearest(&["li"], &["ul", "ol", "menu", "table", "td", "th"]),
            "dt" | "dd" => self.close_nearest(&["dt", "dd"], &["dl", "table", "td", "th"]),
            "option" => self.close_nearest(&["option"], &["select", "datalist", "optgroup"]),
            "optgroup" => self.close_nearest(&["option", "optgroup"], &["select"]),
            "tr" => self.close_nearest(&["tr"], &["table", "thead", "tbody", "tfoot"]),
            "td" | "th" => self.close_nearest(&["td", "th"], &["tr", "table"]),
            "thead" | "tbody" | "tfoot" => {
                self.close_nearest(&["thead", "tbody", "tfoot"], &["table"]);
            }
            _ => {}
        }
    }

    /// Pop the nearest open element named in `targets`, along with everything
    /// above it, unless an element named in `boundaries` is found first.
    fn close_nearest(&mut self, targets: &[&str], boundaries: &[&str]) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let Some(tag) = self.tag_name(self.stack_of_open_elements[index]) else {
                continue;
            };
            if targets.contains(&tag) {
                self.stack_of_open_elements.truncate(index);
                return;
            }
            if boundaries.contains(&tag) {
                return;
            }
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    /// With nothing open, content goes straight into the Document.
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.as_element(id).map(|data| data.tag_name.as_str())
    }

    fn insert_node(&mut self, node_type: NodeType) {
        let id = self.tree.alloc(node_type);
        self.tree.append_child(self.current_node(), id);
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data."
    fn insert_text(&mut self, data: String) {
        let parent = self.current_node();
        let previous_text = self
            .tree
            .children(parent)
            .last()
            .copied()
            .and_then(|last| self.tree.get_mut(last))
            .and_then(|node| match &mut node.node_type {
                NodeType::Text(existing) => Some(existing),
                _ => None,
            });
        match previous_text {
            Some(existing) => existing.push_str(&data),
            None => self.insert_node(NodeType::Text(data)),
        }
    }

    /// Record a parse issue.
    ///
    /// Logs via quill-common's warning system and stores the issue for later retrieval.
    fn parse_issue(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
        });
    }
}

/// Render the subtree at `id` as an indented outline, one node per line.
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    dump_node(tree, id, 0, &mut out);
    out
}

fn dump_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}Document"),
        NodeType::Doctype(raw) => writeln!(out, "{prefix}<{raw}>"),
        NodeType::Element(data) => {
            let mut line = format!("{prefix}<{}", data.tag_name);
            for (name, value) in data.attrs.iter() {
                let _ = write!(line, " {name}=\"{value}\"");
            }
            writeln!(out, "{line}>")
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
    };
    for &child in tree.children(id) {
        dump_node(tree, child, indent + 1, out);
    }
}
