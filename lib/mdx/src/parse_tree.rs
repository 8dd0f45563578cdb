//! The parse tree of an MDX statement.
//!
//! The tree is produced by a parser and validator outside of this crate. Identifiers in the tree
//! are not resolved yet, except for the schema object nodes (e.g., [ParseTreeNode::Member]) that
//! a validator may insert.

use oxsdatatypes::Decimal;
use rdf_olap_model::identifier::{split_unique_name, unique_name_from_segments};
use rdf_olap_model::metadata::{Cube, Dimension, Hierarchy, Level, Member, MetadataObject};
use rdf_olap_model::AxisOrdinal;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A node of the parse tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseTreeNode {
    Select(Box<SelectNode>),
    Axis(Box<AxisNode>),
    Call(CallNode),
    Identifier(IdentifierNode),
    Literal(LiteralNode),
    Member(Arc<Member>),
    Level(Arc<Level>),
    Hierarchy(Arc<Hierarchy>),
    Dimension(Arc<Dimension>),
    Cube(Arc<Cube>),
    Parameter(ParameterNode),
    WithMember(WithMemberNode),
    WithSet(WithSetNode),
    PropertyValue(PropertyValueNode),
    DrillThrough(Box<DrillThroughNode>),
}

impl ParseTreeNode {
    /// Creates an identifier from its (unbracketed) segments.
    pub fn identifier<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        ParseTreeNode::Identifier(IdentifierNode::new(segments))
    }

    /// Creates an identifier by splitting a unique name like `[Time].[2020]`.
    pub fn parse_identifier(unique_name: &str) -> Self {
        ParseTreeNode::Identifier(IdentifierNode::parse(unique_name))
    }

    pub fn call(
        operator_name: impl Into<String>,
        syntax: Syntax,
        args: impl IntoIterator<Item = ParseTreeNode>,
    ) -> Self {
        ParseTreeNode::Call(CallNode {
            operator_name: operator_name.into(),
            syntax,
            args: args.into_iter().collect(),
        })
    }

    /// Creates a call with the function syntax, e.g., `Crossjoin(a, b)`.
    pub fn function(
        operator_name: impl Into<String>,
        args: impl IntoIterator<Item = ParseTreeNode>,
    ) -> Self {
        Self::call(operator_name, Syntax::Function, args)
    }

    /// Creates a binary operator call, e.g., `a + b`.
    pub fn infix(operator_name: impl Into<String>, lhs: ParseTreeNode, rhs: ParseTreeNode) -> Self {
        Self::call(operator_name, Syntax::Infix, [lhs, rhs])
    }

    /// Creates a set, e.g., `{a, b}`.
    pub fn set(elements: impl IntoIterator<Item = ParseTreeNode>) -> Self {
        Self::call("{}", Syntax::Braces, elements)
    }

    /// Creates a tuple, e.g., `(a, b)`.
    pub fn tuple(elements: impl IntoIterator<Item = ParseTreeNode>) -> Self {
        Self::call("()", Syntax::Parentheses, elements)
    }

    pub fn numeric(value: impl Into<Decimal>) -> Self {
        ParseTreeNode::Literal(LiteralNode::Numeric(value.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        ParseTreeNode::Literal(LiteralNode::String(value.into()))
    }

    pub fn symbol(value: impl Into<String>) -> Self {
        ParseTreeNode::Literal(LiteralNode::Symbol(value.into()))
    }

    /// Returns the name of the node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseTreeNode::Select(_) => "Select",
            ParseTreeNode::Axis(_) => "Axis",
            ParseTreeNode::Call(_) => "Call",
            ParseTreeNode::Identifier(_) => "Identifier",
            ParseTreeNode::Literal(_) => "Literal",
            ParseTreeNode::Member(_) => "Member",
            ParseTreeNode::Level(_) => "Level",
            ParseTreeNode::Hierarchy(_) => "Hierarchy",
            ParseTreeNode::Dimension(_) => "Dimension",
            ParseTreeNode::Cube(_) => "Cube",
            ParseTreeNode::Parameter(_) => "Parameter",
            ParseTreeNode::WithMember(_) => "WithMember",
            ParseTreeNode::WithSet(_) => "WithSet",
            ParseTreeNode::PropertyValue(_) => "PropertyValue",
            ParseTreeNode::DrillThrough(_) => "DrillThrough",
        }
    }
}

impl Display for ParseTreeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseTreeNode::Select(select) => select.fmt(f),
            ParseTreeNode::Axis(axis) => axis.fmt(f),
            ParseTreeNode::Call(call) => call.fmt(f),
            ParseTreeNode::Identifier(identifier) => identifier.fmt(f),
            ParseTreeNode::Literal(literal) => literal.fmt(f),
            ParseTreeNode::Member(member) => f.write_str(member.unique_name()),
            ParseTreeNode::Level(level) => f.write_str(level.unique_name()),
            ParseTreeNode::Hierarchy(hierarchy) => f.write_str(hierarchy.unique_name()),
            ParseTreeNode::Dimension(dimension) => f.write_str(dimension.unique_name()),
            ParseTreeNode::Cube(cube) => f.write_str(cube.unique_name()),
            ParseTreeNode::Parameter(parameter) => write!(
                f,
                "Parameter('{}', {}, {})",
                parameter.name, parameter.type_name, parameter.default_value
            ),
            ParseTreeNode::WithMember(member) => member.fmt(f),
            ParseTreeNode::WithSet(set) => write!(f, "SET {} AS {}", set.name, set.expression),
            ParseTreeNode::PropertyValue(property) => property.fmt(f),
            ParseTreeNode::DrillThrough(drill_through) => drill_through.fmt(f),
        }
    }
}

/// How a call is written. Determines how the call is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// `Name(args)`
    Function,
    /// `arg.Name`
    Property,
    /// `arg.Name(args)`
    Method,
    /// `lhs op rhs`
    Infix,
    /// `op arg`
    Prefix,
    /// `arg op`
    Postfix,
    /// `{args}`
    Braces,
    /// `(args)`
    Parentheses,
    /// `CASE ... END`
    Case,
    /// `CAST(value AS type)`
    Cast,
    /// An empty expression, e.g., a missing argument.
    Empty,
}

/// A call of a function or an operator.
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub operator_name: String,
    pub syntax: Syntax,
    pub args: Vec<ParseTreeNode>,
}

impl Display for CallNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.operator_name;
        match (self.syntax, self.args.as_slice()) {
            (Syntax::Property, [arg]) => write!(f, "{arg}.{name}"),
            (Syntax::Method, [arg, rest @ ..]) => write!(f, "{arg}.{name}({})", join(rest)),
            (Syntax::Infix, [lhs, rhs]) => write!(f, "{lhs} {name} {rhs}"),
            (Syntax::Prefix, [arg]) => write!(f, "{name} {arg}"),
            (Syntax::Postfix, [arg]) => write!(f, "{arg} {name}"),
            (Syntax::Braces, args) => write!(f, "{{{}}}", join(args)),
            (Syntax::Parentheses, args) => write!(f, "({})", join(args)),
            (Syntax::Cast, [value, target]) => write!(f, "CAST({value} AS {target})"),
            (Syntax::Case, args) => {
                f.write_str("CASE")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(" END")
            }
            (Syntax::Empty, _) => Ok(()),
            (_, args) => write!(f, "{name}({})", join(args)),
        }
    }
}

/// A dot-separated identifier, e.g., `[Time].[2020]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierNode {
    segments: Vec<String>,
}

impl IdentifierNode {
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(unique_name: &str) -> Self {
        Self::new(split_unique_name(unique_name))
    }

    /// The unbracketed segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The bracketed unique name of the identifier.
    pub fn unique_name(&self) -> String {
        unique_name_from_segments(&self.segments)
    }

    /// The last segment.
    pub fn name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }
}

impl Display for IdentifierNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unique_name())
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralNode {
    Numeric(Decimal),
    String(String),
    /// A bare keyword, e.g., the target type of a cast.
    Symbol(String),
    Null,
}

impl Display for LiteralNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralNode::Numeric(value) => value.fmt(f),
            LiteralNode::String(value) => write!(f, "'{}'", value.replace('\'', "''")),
            LiteralNode::Symbol(value) => f.write_str(value),
            LiteralNode::Null => f.write_str("NULL"),
        }
    }
}

/// A `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectNode {
    /// The `WITH MEMBER` and `WITH SET` definitions.
    pub with: Vec<ParseTreeNode>,
    pub axes: Vec<AxisNode>,
    pub from: ParseTreeNode,
    /// The slicer (`WHERE` clause).
    pub filter: Option<AxisNode>,
    pub cell_properties: Vec<IdentifierNode>,
}

impl SelectNode {
    /// Creates a query on the cube `from` without axes.
    pub fn new(from: ParseTreeNode) -> Self {
        Self {
            with: Vec::new(),
            axes: Vec::new(),
            from,
            filter: None,
            cell_properties: Vec::new(),
        }
    }

    /// Creates a query on the cube with the given name.
    pub fn from_cube(cube_name: &str) -> Self {
        Self::new(ParseTreeNode::identifier([cube_name]))
    }

    #[must_use]
    pub fn with_definition(mut self, definition: ParseTreeNode) -> Self {
        self.with.push(definition);
        self
    }

    #[must_use]
    pub fn with_axis(mut self, ordinal: AxisOrdinal, expression: ParseTreeNode) -> Self {
        self.axes.push(AxisNode::new(ordinal, expression));
        self
    }

    #[must_use]
    pub fn with_filter(mut self, expression: ParseTreeNode) -> Self {
        self.filter = Some(AxisNode::new(AxisOrdinal::Filter, expression));
        self
    }
}

impl Display for SelectNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.with.is_empty() {
            f.write_str("WITH")?;
            for definition in &self.with {
                write!(f, " {definition}")?;
            }
            f.write_str(" ")?;
        }
        f.write_str("SELECT ")?;
        f.write_str(
            &self
                .axes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        )?;
        write!(f, " FROM {}", self.from)?;
        if let Some(filter) = &self.filter {
            write!(f, " WHERE {}", filter.expression)?;
        }
        Ok(())
    }
}

/// An axis specification of a `SELECT` statement, e.g., `{...} ON COLUMNS`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisNode {
    pub ordinal: AxisOrdinal,
    pub non_empty: bool,
    pub expression: ParseTreeNode,
    pub dimension_properties: Vec<IdentifierNode>,
}

impl AxisNode {
    pub fn new(ordinal: AxisOrdinal, expression: ParseTreeNode) -> Self {
        Self {
            ordinal,
            non_empty: false,
            expression,
            dimension_properties: Vec::new(),
        }
    }
}

impl Display for AxisNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.non_empty {
            f.write_str("NON EMPTY ")?;
        }
        write!(f, "{} ON {}", self.expression, self.ordinal)
    }
}

/// A parameter with a type and a default value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub name: String,
    pub type_name: String,
    pub default_value: Box<ParseTreeNode>,
}

/// `MEMBER name AS expression`
#[derive(Debug, Clone, PartialEq)]
pub struct WithMemberNode {
    pub name: IdentifierNode,
    pub expression: Box<ParseTreeNode>,
    pub properties: Vec<PropertyValueNode>,
}

impl WithMemberNode {
    pub fn new(name: IdentifierNode, expression: ParseTreeNode) -> Self {
        Self {
            name,
            expression: Box::new(expression),
            properties: Vec::new(),
        }
    }
}

impl Display for WithMemberNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "MEMBER {} AS {}", self.name, self.expression)?;
        for property in &self.properties {
            write!(f, ", {property}")?;
        }
        Ok(())
    }
}

/// `SET name AS expression`
#[derive(Debug, Clone, PartialEq)]
pub struct WithSetNode {
    pub name: IdentifierNode,
    pub expression: Box<ParseTreeNode>,
}

impl WithSetNode {
    pub fn new(name: IdentifierNode, expression: ParseTreeNode) -> Self {
        Self {
            name,
            expression: Box::new(expression),
        }
    }
}

/// A property assignment of a calculated member, e.g., `FORMAT_STRING = '#.##'`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValueNode {
    pub name: String,
    pub expression: Box<ParseTreeNode>,
}

impl Display for PropertyValueNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.expression)
    }
}

/// `DRILLTHROUGH [MAXROWS n] [FIRSTROWSET n] SELECT ... [RETURN ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct DrillThroughNode {
    pub select: SelectNode,
    pub max_rows: Option<usize>,
    pub first_row_set: Option<usize>,
    pub return_list: Vec<ParseTreeNode>,
}

impl Display for DrillThroughNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("DRILLTHROUGH")?;
        if let Some(max_rows) = self.max_rows {
            write!(f, " MAXROWS {max_rows}")?;
        }
        if let Some(first_row_set) = self.first_row_set {
            write!(f, " FIRSTROWSET {first_row_set}")?;
        }
        write!(f, " {}", self.select)?;
        if !self.return_list.is_empty() {
            write!(f, " RETURN {}", join(&self.return_list))?;
        }
        Ok(())
    }
}

fn join(nodes: &[ParseTreeNode]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
