//! Structural summary of a parsed module.

use crate::ast::{Expr, FunctionDef, Module, Stmt};
use std::fmt;

/// One entry per function or class, in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryReport {
    entries: Vec<String>,
}

impl SummaryReport {
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entries.join("\n"))
    }
}

/// Walk `module` and describe every function and class in it.
pub fn summarize_module(module: &Module) -> SummaryReport {
    let mut summarizer = CodeSummarizer::default();
    summarizer.visit_body(&module.body);
    SummaryReport {
        entries: summarizer.entries,
    }
}

#[derive(Default)]
struct CodeSummarizer {
    entries: Vec<String>,
}

impl CodeSummarizer {
    fn visit_body(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.visit(stmt);
        }
    }

    fn visit(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(def) => {
                // async defs get no entry of their own
                if !def.is_async {
                    self.entries.push(function_entry(def));
                }
                self.visit_body(&def.body);
            }
            Stmt::ClassDef { name, body } => {
                self.entries.push(format!("Class: {name}"));
                self.visit_body(body);
            }
            Stmt::If { body, orelse, .. } | Stmt::For { body, orelse, .. } => {
                self.visit_body(body);
                self.visit_body(orelse);
            }
            Stmt::Compound { blocks } => {
                for block in blocks {
                    self.visit_body(block);
                }
            }
            Stmt::Assign { .. } | Stmt::Expr(_) | Stmt::Return(_) | Stmt::Other => {}
        }
    }
}

fn function_entry(def: &FunctionDef) -> String {
    let mut entry = format!("Function: {}({})", def.name, def.params.args.join(", "));
    let digest = digest(&def.body);
    if !digest.is_empty() {
        entry.push_str("\n  Body: ");
        entry.push_str(&digest);
    }
    entry
}

/// One-line digest of the direct statements of a function body.
fn digest(body: &[Stmt]) -> String {
    body.iter()
        .filter_map(|stmt| match stmt {
            Stmt::Assign { targets, value } => {
                let targets: Vec<String> = targets.iter().map(render).collect();
                Some(format!("{} = {}", targets.join(", "), render(value)))
            }
            Stmt::If { test, .. } => Some(format!("if {}: ...", render(test))),
            Stmt::For {
                target,
                iter,
                is_async: false,
                ..
            } => Some(format!("for {} in {}: ...", render(target), render(iter))),
            Stmt::Expr(Expr::Call { func, args }) => {
                let args: Vec<String> = args.iter().map(render).collect();
                Some(format!("{}({})", render(func), args.join(", ")))
            }
            Stmt::Return(value) => Some(format!(
                "return {}",
                value.as_ref().map_or_else(|| "...".to_string(), render)
            )),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Short textual form of an expression.
fn render(expr: &Expr) -> String {
    match expr {
        Expr::Name(id) => id.clone(),
        Expr::Attribute { value, attr } => format!("{}.{attr}", render(value)),
        Expr::Call { func, .. } => render(func),
        Expr::Constant(value) => value.to_string(),
        Expr::BinOp { left, op, right } => {
            format!("{} {} {}", render(left), op.symbol(), render(right))
        }
        Expr::Other => "...".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOperator, Parameters};
    use crate::literal::Constant;

    fn name(id: &str) -> Expr {
        Expr::Name(id.to_string())
    }

    fn function(name: &str, args: &[&str], body: Vec<Stmt>) -> Stmt {
        Stmt::FunctionDef(FunctionDef {
            name: name.to_string(),
            params: Parameters {
                args: args.iter().map(|a| a.to_string()).collect(),
                ..Parameters::default()
            },
            body,
            is_async: false,
        })
    }

    #[test]
    fn test_render_expressions() {
        let call = Expr::Call {
            func: Box::new(Expr::Attribute {
                value: Box::new(name("os")),
                attr: "getcwd".to_string(),
            }),
            args: vec![name("ignored")],
        };
        assert_eq!(render(&call), "os.getcwd");
        assert_eq!(render(&Expr::Constant(Constant::Int("3".into()))), "3");
        assert_eq!(render(&Expr::Other), "...");

        let pow = Expr::BinOp {
            left: Box::new(name("a")),
            op: BinOperator::Pow,
            right: Box::new(name("b")),
        };
        assert_eq!(render(&pow), "a ? b");
    }

    #[test]
    fn test_digest_skips_unrecognized_statements() {
        let body = vec![
            Stmt::Other,
            Stmt::Assign {
                targets: vec![name("a"), name("b")],
                value: name("v"),
            },
            Stmt::Compound { blocks: vec![] },
            Stmt::Return(None),
        ];
        assert_eq!(digest(&body), "a, b = v | return ...");
    }

    #[test]
    fn test_preorder_entries() {
        let module = Module {
            body: vec![
                Stmt::ClassDef {
                    name: "A".to_string(),
                    body: vec![function("m", &["self"], vec![Stmt::Other])],
                },
                function("g", &[], vec![]),
            ],
        };
        let report = summarize_module(&module);
        assert_eq!(report.entries(), ["Class: A", "Function: m(self)", "Function: g()"]);
        assert_eq!(report.to_string(), "Class: A\nFunction: m(self)\nFunction: g()");
    }

    #[test]
    fn test_async_function_is_descended_but_not_listed() {
        let inner = function("inner", &[], vec![]);
        let module = Module {
            body: vec![Stmt::FunctionDef(FunctionDef {
                name: "outer".to_string(),
                params: Parameters::default(),
                body: vec![inner],
                is_async: true,
            })],
        };
        assert_eq!(summarize_module(&module).entries(), ["Function: inner()"]);
    }

    #[test]
    fn test_empty_module_gives_empty_report() {
        let report = summarize_module(&Module { body: vec![] });
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }
}
