// AST definitions for the JavaScript subset

/// Source location information for error reporting and line highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

/// Update operators (`++` / `--`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Inc,
    Dec,
}

/// Body of an arrow function: a block or a single expression (implicit return)
#[derive(Debug, Clone)]
pub enum ArrowBody {
    Block(Vec<Node>),
    Expr(Box<Node>),
}

/// AST nodes representing statements and expressions
#[derive(Debug, Clone)]
pub enum Node {
    // Statements
    Block {
        body: Vec<Node>,
        location: SourceLocation,
    },
    ExpressionStatement {
        expr: Box<Node>,
        location: SourceLocation,
    },
    VarDecl {
        name: String,
        init: Option<Box<Node>>,
        location: SourceLocation,
    },
    FunctionDecl {
        name: String,
        params: Vec<String>,
        body: Vec<Node>,
        is_async: bool,
        location: SourceLocation,
    },
    If {
        condition: Box<Node>,
        then_branch: Vec<Node>,
        else_branch: Option<Vec<Node>>,
        location: SourceLocation,
    },
    For {
        init: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Vec<Node>,
        location: SourceLocation,
    },
    Return {
        expr: Option<Box<Node>>,
        location: SourceLocation,
    },

    // Expressions
    NumberLiteral(f64, SourceLocation),
    StringLiteral(String, SourceLocation),
    BoolLiteral(bool, SourceLocation),
    TemplateLiteral {
        quasis: Vec<String>,
        exprs: Vec<Node>,
        location: SourceLocation,
    },
    ArrayLiteral {
        elements: Vec<Node>,
        location: SourceLocation,
    },
    Identifier(String, SourceLocation),
    Binary {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
        location: SourceLocation,
    },
    Assignment {
        name: String,
        op: Option<BinOp>, // compound assignment operator, None for plain `=`
        value: Box<Node>,
        location: SourceLocation,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        name: String,
        location: SourceLocation,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
        location: SourceLocation,
    },
    Member {
        object: Box<Node>,
        property: String,
        location: SourceLocation,
    },
    ArrowFunction {
        params: Vec<String>,
        body: ArrowBody,
        is_async: bool,
        location: SourceLocation,
    },
    Await {
        expr: Box<Node>,
        location: SourceLocation,
    },
}

impl Node {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            Node::Block { location, .. } => *location,
            Node::ExpressionStatement { location, .. } => *location,
            Node::VarDecl { location, .. } => *location,
            Node::FunctionDecl { location, .. } => *location,
            Node::If { location, .. } => *location,
            Node::For { location, .. } => *location,
            Node::Return { location, .. } => *location,
            Node::NumberLiteral(_, loc) => *loc,
            Node::StringLiteral(_, loc) => *loc,
            Node::BoolLiteral(_, loc) => *loc,
            Node::TemplateLiteral { location, .. } => *location,
            Node::ArrayLiteral { location, .. } => *location,
            Node::Identifier(_, loc) => *loc,
            Node::Binary { location, .. } => *location,
            Node::Assignment { location, .. } => *location,
            Node::Update { location, .. } => *location,
            Node::Call { location, .. } => *location,
            Node::Member { location, .. } => *location,
            Node::ArrowFunction { location, .. } => *location,
            Node::Await { location, .. } => *location,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub body: Vec<Node>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
