use serde::{Deserialize, Serialize};

/// One source file handed over by the transform driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceFile {
    /// Path as the build pipeline reports it (absolute or project-relative)
    pub path: String,

    /// Top-level markup nodes found in the file
    pub nodes: Vec<MarkupNode>,
}

/// A node in a markup tree as produced by the parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkupNode {
    Element(Element),
    Fragment(Fragment),
    Expression { expression: Expression },
    Text { value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    pub name: String,

    /// Opening tag position (1-based line, 0-based column)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Position>,

    #[serde(default)]
    pub attributes: Vec<AttributeItem>,

    #[serde(default)]
    pub children: Vec<MarkupNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Fragment {
    #[serde(default)]
    pub children: Vec<MarkupNode>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Expression container contents, reduced to what the dynamic rule inspects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    /// `{}` or `{/* comment */}`
    Empty,
    /// `{null}`
    Null,
    Identifier { name: String },
    /// Anything else, kept as source text
    Other { source: String },
}

impl Expression {
    /// Placeholder-ish expressions that can never render anything.
    pub fn is_trivial(&self) -> bool {
        match self {
            Expression::Empty | Expression::Null => true,
            Expression::Identifier { name } => name == "undefined",
            Expression::Other { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeItem {
    Attribute {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<AttributeValue>,
    },
    Spread { argument: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    String(String),
    Expression(Expression),
}

impl AttributeItem {
    pub fn string(name: &str, value: impl Into<String>) -> Self {
        AttributeItem::Attribute {
            name: name.to_string(),
            value: Some(AttributeValue::String(value.into())),
        }
    }

    /// Name of a plain attribute; spreads have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            AttributeItem::Attribute { name, .. } => Some(name),
            AttributeItem::Spread { .. } => None,
        }
    }
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            loc: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.loc = Some(Position { line, column });
        self
    }

    pub fn child(mut self, node: MarkupNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name() == Some(name))
    }

    /// String value of a named attribute, if it has one.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find_map(|a| match a {
            AttributeItem::Attribute {
                name: n,
                value: Some(AttributeValue::String(v)),
            } if n == name => Some(v.as_str()),
            _ => None,
        })
    }
}

impl MarkupNode {
    pub fn expr(expression: Expression) -> Self {
        MarkupNode::Expression { expression }
    }

    pub fn ident(name: &str) -> Self {
        MarkupNode::expr(Expression::Identifier {
            name: name.to_string(),
        })
    }

    pub fn text(value: &str) -> Self {
        MarkupNode::Text {
            value: value.to_string(),
        }
    }

    pub fn fragment(children: Vec<MarkupNode>) -> Self {
        MarkupNode::Fragment(Fragment { children })
    }
}

impl From<Element> for MarkupNode {
    fn from(el: Element) -> Self {
        MarkupNode::Element(el)
    }
}
