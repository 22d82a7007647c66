//! Python parsing on top of tree-sitter.
//!
//! tree-sitter recovers from errors and accepts a superset of Python 3, so
//! the tree is checked first: any error or missing node, Python 2 statements,
//! empty blocks, misaligned statements and literals Python 3 rejects all fail
//! the parse. The checked tree is then lowered into the closed [`Module`] tree.

use crate::ast::{BinOperator, Expr, FunctionDef, Module, Parameters, Stmt};
use crate::error::{ParseError, TokenizeError};
use crate::literal::{self, Constant, StringValue};
use crate::tokenizer::tokenize;
use tree_sitter::{Node, Parser};

/// Deepest syntax tree accepted; lowering and rendering recurse once per level.
const MAX_NESTING: usize = 500;

/// Parse Python 3 source into a [`Module`].
pub fn parse(source: &str) -> Result<Module, ParseError> {
    check_layout(source)?;

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError::Grammar(e.to_string()))?;
    let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
    let root = tree.root_node();

    if root.has_error() {
        if let Some(node) = first_error(root) {
            let message = if node.is_missing() {
                format!("expected '{}'", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            return Err(ParseError::at(message, node.start_position()));
        }
    }

    let lowering = Lowering { source };
    lowering.validate(root)?;
    let body = lowering.lower_statements(root)?;
    Ok(Module { body })
}

/// tree-sitter does not track indentation levels; the tokenizer does.
fn check_layout(source: &str) -> Result<(), ParseError> {
    let Err(error) = tokenize(source) else {
        return Ok(());
    };
    let (message, line, column) = match error {
        TokenizeError::InconsistentDedent { line } => (
            "unindent does not match any outer indentation level".to_string(),
            line,
            1,
        ),
        TokenizeError::UnterminatedString(pos) => (
            "unterminated triple-quoted string literal".to_string(),
            pos.row,
            pos.col + 1,
        ),
        TokenizeError::UnterminatedStatement(pos) => {
            ("unexpected EOF while parsing".to_string(), pos.row, pos.col + 1)
        }
    };
    Err(ParseError::Syntax {
        message,
        line,
        column,
    })
}

/// First error or missing node in document order.
fn first_error<'t>(root: Node<'t>) -> Option<Node<'t>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Named children, comments excluded.
fn named<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn field<'t>(node: Node<'t>, name: &str) -> Result<Node<'t>, ParseError> {
    node.child_by_field_name(name)
        .ok_or_else(|| ParseError::at("invalid syntax", node.start_position()))
}

fn is_async(node: Node<'_>) -> bool {
    node.child(0).is_some_and(|child| child.kind() == "async")
}

/// Tuple parameters, and non-default positional parameters after default ones.
fn check_parameters(node: Node<'_>) -> Result<(), ParseError> {
    let mut after_default = false;
    let mut keyword_only = false;

    for param in named(node) {
        let is_default = matches!(
            param.kind(),
            "default_parameter" | "typed_default_parameter"
        );
        let name = match param.kind() {
            "typed_parameter" => named(param).first().copied(),
            _ if is_default => param.child_by_field_name("name"),
            _ => Some(param),
        };
        let Some(name) = name else { continue };

        match name.kind() {
            "tuple_pattern" => return Err(ParseError::at("invalid syntax", param.start_position())),
            "list_splat_pattern" | "keyword_separator" => keyword_only = true,
            "identifier" if after_default && !is_default && !keyword_only => {
                return Err(ParseError::at(
                    "non-default argument follows default argument",
                    param.start_position(),
                ))
            }
            _ => {}
        }
        if is_default {
            after_default = true;
        }
    }
    Ok(())
}

struct Lowering<'a> {
    source: &'a str,
}

impl<'a> Lowering<'a> {
    fn text(&self, node: Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }

    /// Whether `node` is the first thing on a logical line.
    fn starts_line(&self, node: Node<'_>) -> bool {
        let start = node.start_byte();
        let line_start = start - node.start_position().column;
        if !self.source[line_start..start].trim().is_empty() {
            return false;
        }
        let before = &self.source[..line_start];
        let before = before.strip_suffix('\n').unwrap_or(before);
        let before = before.strip_suffix('\r').unwrap_or(before);
        !before.ends_with('\\')
    }

    /// Statements starting a line must share the column of the block's first one.
    fn check_indentation(&self, node: Node<'_>) -> Result<(), ParseError> {
        let statements = named(node);
        let Some(first) = statements.first() else {
            return Ok(());
        };
        let column = if node.kind() == "module" {
            0
        } else {
            first.start_position().column
        };

        for stmt in statements {
            let start = stmt.start_position();
            if start.column != column && self.starts_line(stmt) {
                let message = if start.column > column {
                    "unexpected indent"
                } else {
                    "unindent does not match any outer indentation level"
                };
                return Err(ParseError::at(message, start));
            }
        }
        Ok(())
    }

    /// Reject what tree-sitter accepts but Python 3 does not.
    fn validate(&self, root: Node<'_>) -> Result<(), ParseError> {
        let mut cursor = root.walk();
        let mut depth = 0;
        loop {
            let node = cursor.node();
            if depth > MAX_NESTING {
                return Err(ParseError::at(
                    "maximum recursion depth exceeded during compilation",
                    node.start_position(),
                ));
            }
            self.check_node(node)?;
            if cursor.goto_first_child() {
                depth += 1;
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(());
                }
                depth -= 1;
            }
        }
    }

    fn check_node(&self, node: Node<'_>) -> Result<(), ParseError> {
        let at = |message: String| ParseError::at(message, node.start_position());

        match node.kind() {
            "block" if named(node).is_empty() => {
                Err(at("expected an indented block".to_string()))
            }
            "print_statement" if self.print_arguments(node).is_none() => {
                Err(at("Missing parentheses in call to 'print'".to_string()))
            }
            "module" | "block" => self.check_indentation(node),
            "exec_statement" => Err(at("Missing parentheses in call to 'exec'".to_string())),
            "integer" | "float" => literal::parse_number(self.text(node)).map(|_| ()).map_err(at),
            "string" => literal::parse_string(self.text(node)).map(|_| ()).map_err(at),
            "concatenated_string" => self.concatenated(node).map(|_| ()),
            "parameters" | "lambda_parameters" => check_parameters(node),
            _ => Ok(()),
        }
    }

    /// Arguments of a `print (...)` statement that reads as a Python 3 call.
    fn print_arguments<'t>(&self, node: Node<'t>) -> Option<Vec<Node<'t>>> {
        let mut cursor = node.walk();
        let arguments: Vec<Node<'t>> = node
            .children_by_field_name("argument", &mut cursor)
            .collect();
        let has_chevron = named(node).iter().any(|child| child.kind() == "chevron");

        match arguments.as_slice() {
            [single] if !has_chevron => match single.kind() {
                "parenthesized_expression" | "tuple" => Some(named(*single)),
                _ => None,
            },
            _ => None,
        }
    }

    fn lower_statements(&self, node: Node<'_>) -> Result<Vec<Stmt>, ParseError> {
        named(node)
            .into_iter()
            .map(|child| self.lower_stmt(child))
            .collect()
    }

    fn lower_block(&self, node: Node<'_>) -> Result<Vec<Stmt>, ParseError> {
        if node.kind() != "block" {
            return Err(ParseError::at("invalid syntax", node.start_position()));
        }
        self.lower_statements(node)
    }

    fn lower_stmt(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        match node.kind() {
            "function_definition" => self.lower_function(node),
            "class_definition" => Ok(Stmt::ClassDef {
                name: self.text(field(node, "name")?).to_string(),
                body: self.lower_block(field(node, "body")?)?,
            }),
            "decorated_definition" => self.lower_stmt(field(node, "definition")?),
            "expression_statement" => self.lower_expression_statement(node),
            "return_statement" => {
                let value = named(node).first().map(|v| self.lower_expr(*v)).transpose()?;
                Ok(Stmt::Return(value))
            }
            "if_statement" => self.lower_if(node),
            "for_statement" => {
                let orelse = match node.child_by_field_name("alternative") {
                    Some(clause) => self.lower_block(field(clause, "body")?)?,
                    None => Vec::new(),
                };
                Ok(Stmt::For {
                    target: self.lower_expr(field(node, "left")?)?,
                    iter: self.lower_expr(field(node, "right")?)?,
                    body: self.lower_block(field(node, "body")?)?,
                    orelse,
                    is_async: is_async(node),
                })
            }
            "while_statement" | "with_statement" | "try_statement" | "match_statement" => {
                let mut blocks = Vec::new();
                self.collect_blocks(node, &mut blocks)?;
                Ok(Stmt::Compound { blocks })
            }
            "print_statement" => match self.print_arguments(node) {
                Some(arguments) => Ok(Stmt::Expr(Expr::Call {
                    func: Box::new(Expr::Name("print".to_string())),
                    args: arguments
                        .into_iter()
                        .map(|arg| self.lower_expr(arg))
                        .collect::<Result<_, _>>()?,
                })),
                None => Ok(Stmt::Other),
            },
            _ => Ok(Stmt::Other),
        }
    }

    fn lower_function(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        Ok(Stmt::FunctionDef(FunctionDef {
            name: self.text(field(node, "name")?).to_string(),
            params: self.lower_parameters(field(node, "parameters")?),
            body: self.lower_block(field(node, "body")?)?,
            is_async: is_async(node),
        }))
    }

    fn lower_parameters(&self, node: Node<'_>) -> Parameters {
        let mut params = Parameters::default();
        let mut keyword_only = false;

        for param in named(node) {
            let name = match param.kind() {
                "identifier" => Some(param),
                "typed_parameter" => named(param).first().copied(),
                "default_parameter" | "typed_default_parameter" => {
                    param.child_by_field_name("name")
                }
                _ => Some(param),
            };
            let Some(name) = name else { continue };

            match name.kind() {
                "identifier" => {
                    let name = self.text(name).to_string();
                    if keyword_only {
                        params.kwonly.push(name);
                    } else {
                        params.args.push(name);
                    }
                }
                "list_splat_pattern" => {
                    params.vararg = named(name).first().map(|n| self.text(*n).to_string());
                    keyword_only = true;
                }
                "dictionary_splat_pattern" => {
                    params.kwarg = named(name).first().map(|n| self.text(*n).to_string());
                }
                "keyword_separator" => keyword_only = true,
                "positional_separator" => {
                    params.posonly.append(&mut params.args);
                }
                _ => {}
            }
        }

        params
    }

    fn lower_expression_statement(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        let children = named(node);
        let mut cursor = node.walk();
        let is_tuple = node.children(&mut cursor).any(|child| child.kind() == ",");

        match children.as_slice() {
            [child] if !is_tuple => match child.kind() {
                "assignment" => self.lower_assignment(*child),
                "augmented_assignment" => Ok(Stmt::Other),
                _ => Ok(Stmt::Expr(self.lower_expr(*child)?)),
            },
            _ => Ok(Stmt::Expr(Expr::Other)),
        }
    }

    /// `a = b = value` arrives as nested assignments; flatten the targets.
    fn lower_assignment(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        let mut targets = Vec::new();
        let mut current = node;

        loop {
            if current.child_by_field_name("type").is_some() {
                return Ok(Stmt::Other);
            }
            targets.push(self.lower_expr(field(current, "left")?)?);
            let Some(right) = current.child_by_field_name("right") else {
                return Ok(Stmt::Other);
            };
            match right.kind() {
                "assignment" => current = right,
                "augmented_assignment" => return Ok(Stmt::Other),
                _ => {
                    return Ok(Stmt::Assign {
                        targets,
                        value: self.lower_expr(right)?,
                    })
                }
            }
        }
    }

    fn lower_if(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        let mut cursor = node.walk();
        let alternatives: Vec<Node<'_>> = node
            .children_by_field_name("alternative", &mut cursor)
            .collect();

        Ok(Stmt::If {
            test: self.lower_expr(field(node, "condition")?)?,
            body: self.lower_block(field(node, "consequence")?)?,
            orelse: self.lower_alternatives(&alternatives)?,
        })
    }

    fn lower_alternatives(&self, alternatives: &[Node<'_>]) -> Result<Vec<Stmt>, ParseError> {
        let Some((first, rest)) = alternatives.split_first() else {
            return Ok(Vec::new());
        };
        match first.kind() {
            "elif_clause" => Ok(vec![Stmt::If {
                test: self.lower_expr(field(*first, "condition")?)?,
                body: self.lower_block(field(*first, "consequence")?)?,
                orelse: self.lower_alternatives(rest)?,
            }]),
            "else_clause" => self.lower_block(field(*first, "body")?),
            _ => Ok(Vec::new()),
        }
    }

    /// Blocks of a compound statement and of its clauses, in source order.
    fn collect_blocks(&self, node: Node<'_>, blocks: &mut Vec<Vec<Stmt>>) -> Result<(), ParseError> {
        for child in named(node) {
            let kind = child.kind();
            if kind == "block" {
                let holds_cases = named(child).iter().any(|n| n.kind() == "case_clause");
                if holds_cases {
                    self.collect_blocks(child, blocks)?;
                } else {
                    blocks.push(self.lower_statements(child)?);
                }
            } else if kind.ends_with("_clause") {
                self.collect_blocks(child, blocks)?;
            }
        }
        Ok(())
    }

    fn lower_expr(&self, node: Node<'_>) -> Result<Expr, ParseError> {
        let expr = match node.kind() {
            "identifier" | "keyword_identifier" => Expr::Name(self.text(node).to_string()),
            "attribute" => Expr::Attribute {
                value: Box::new(self.lower_expr(field(node, "object")?)?),
                attr: self.text(field(node, "attribute")?).to_string(),
            },
            "call" => Expr::Call {
                func: Box::new(self.lower_expr(field(node, "function")?)?),
                args: self.lower_arguments(field(node, "arguments")?)?,
            },
            "parenthesized_expression" => match named(node).as_slice() {
                [inner] => self.lower_expr(*inner)?,
                _ => Expr::Other,
            },
            "binary_operator" => {
                let op = self.text(field(node, "operator")?);
                match BinOperator::from_token(op) {
                    Some(op) => Expr::BinOp {
                        left: Box::new(self.lower_expr(field(node, "left")?)?),
                        op,
                        right: Box::new(self.lower_expr(field(node, "right")?)?),
                    },
                    None => Expr::Other,
                }
            }
            "integer" | "float" => literal::parse_number(self.text(node))
                .map(Expr::Constant)
                .map_err(|message| ParseError::at(message, node.start_position()))?,
            "string" | "concatenated_string" => self.concatenated(node)?,
            "true" => Expr::Constant(Constant::Bool(true)),
            "false" => Expr::Constant(Constant::Bool(false)),
            "none" => Expr::Constant(Constant::None),
            "ellipsis" => Expr::Constant(Constant::Ellipsis),
            _ => Expr::Other,
        };
        Ok(expr)
    }

    fn lower_arguments(&self, node: Node<'_>) -> Result<Vec<Expr>, ParseError> {
        if node.kind() != "argument_list" {
            // a bare generator argument: f(x for x in y)
            return Ok(vec![Expr::Other]);
        }
        let mut args = Vec::new();
        for arg in named(node) {
            match arg.kind() {
                "keyword_argument" | "dictionary_splat" => {}
                "list_splat" => args.push(Expr::Other),
                _ => args.push(self.lower_expr(arg)?),
            }
        }
        Ok(args)
    }

    /// Value of a string literal or of implicitly concatenated literals.
    fn concatenated(&self, node: Node<'_>) -> Result<Expr, ParseError> {
        let parts = if node.kind() == "concatenated_string" {
            named(node)
        } else {
            vec![node]
        };
        let at = |message: String| ParseError::at(message, node.start_position());

        let mut text: Option<String> = None;
        let mut bytes: Option<Vec<u8>> = None;
        let mut formatted = false;

        for part in parts {
            match literal::parse_string(self.text(part)).map_err(at)? {
                StringValue::Str(s) => text.get_or_insert_with(String::new).push_str(&s),
                StringValue::Bytes(b) => bytes.get_or_insert_with(Vec::new).extend(b),
                StringValue::Formatted => formatted = true,
            }
        }

        match bytes {
            Some(_) if text.is_some() || formatted => {
                Err(at("cannot mix bytes and nonbytes literals".to_string()))
            }
            Some(b) => Ok(Expr::Constant(Constant::Bytes(b))),
            None if formatted => Ok(Expr::Other),
            None => Ok(Expr::Constant(Constant::Str(text.unwrap_or_default()))),
        }
    }
}
