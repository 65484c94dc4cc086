//! Compiled SQF programs.
//!
//! A [`Program`] is the ordered list of function definitions produced by exporting one
//! model. Functions are appended callee first: a pipeline pushes all of its steps' functions
//! before the function that chains them, so rendering the list front to back always defines
//! a function before any other function calls it.
//!
//! Besides rendering to text, a program can be evaluated directly. The interpreter follows
//! the emitted semantics (`_this` is the argument, `_this#i` indexes it, `x call f` invokes
//! `f` with `x`), which makes it possible to compare a compiled program against the model it
//! came from without an SQF runtime.

use std::collections::HashSet;

use itertools::Itertools;
use log::trace;

use crate::{
    config::ExportConfig,
    errors::{EvalError, ExportError},
    expr::Expr,
    format::{normalize_signs, wrap_indented, wrap_units},
};

/// Body of an emitted SQF function.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// An array literal with one element per expression
    Vector(Vec<Expr>),
    /// A single arithmetic expression
    Scalar(Expr),
    /// Threads `_this` through each named function in order and returns it
    Chain(Vec<String>),
}

/// One emitted function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub body: Body,
}

/// A value passed to or returned by an emitted function.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
}

/// Ordered function definitions, callees before callers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    functions: Vec<Function>,
}

impl Function {
    pub fn new(name: impl Into<String>, body: Body) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }

    /// Renders the definition, terminated by `};` and a newline.
    ///
    /// Vector and scalar bodies are sign-normalized and wrapped to the configured line
    /// length. A vector element is never split across lines, while a scalar body may break
    /// at any space. Chain bodies are one statement per line.
    ///
    /// # Example
    /// ```
    /// use sqf_export::expr::Expr;
    /// use sqf_export::program::{Body, Function};
    /// use sqf_export::ExportConfig;
    ///
    /// let square = Function::new(
    ///     "square",
    ///     Body::Vector(vec![Expr::Pow(Box::new(Expr::Input(0)), 2)]),
    /// );
    /// assert_eq!(
    ///     square.render(&ExportConfig::default()),
    ///     "square = {[\n    (_this#0)^2]\n};\n"
    /// );
    /// ```
    pub fn render(&self, config: &ExportConfig) -> String {
        let indent = &config.indent;
        let places = config.decimal_places;
        let width = config.available_width();
        match &self.body {
            Body::Vector(elements) => {
                let last = elements.len().saturating_sub(1);
                let units = elements.iter().enumerate().map(|(i, e)| {
                    let close = if i == last { ']' } else { ',' };
                    format!("{}{close}", normalize_signs(&format!("{e:.places$}")))
                });
                let mut lines = wrap_units(units, width);
                if lines.is_empty() {
                    lines.push("]".to_string());
                }
                let body = lines.join(format!("\n{indent}").as_str());
                format!("{} = {{[\n{indent}{body}\n}};\n", self.name)
            }
            Body::Scalar(expr) => {
                let body = normalize_signs(&format!("{expr:.places$}"));
                let body = wrap_indented(&body, width, indent);
                format!("{} = {{\n{indent}{body}\n}};\n", self.name)
            }
            Body::Chain(callees) => {
                let mut output = format!("{} = {{\n", self.name);
                for callee in callees {
                    output.push_str(&format!("{indent}_this = _this call {callee};\n"));
                }
                output.push_str(&format!("{indent}_this\n}};\n"));
                output
            }
        }
    }

    /// Applies the function to `input`, resolving chained calls in `program`.
    fn apply(&self, program: &Program, input: &Value) -> Result<Value, EvalError> {
        trace!("evaluating {}", self.name);
        match &self.body {
            Body::Vector(elements) => {
                let x = self.vector_input(input)?;
                Ok(Value::Vector(
                    elements
                        .iter()
                        .map(|e| e.eval(x))
                        .collect::<Result<_, _>>()?,
                ))
            }
            Body::Scalar(expr) => Ok(Value::Scalar(expr.eval(self.vector_input(input)?)?)),
            Body::Chain(callees) => callees
                .iter()
                .try_fold(input.clone(), |value, callee| program.call(callee, &value)),
        }
    }

    fn vector_input<'a>(&self, input: &'a Value) -> Result<&'a [f64], EvalError> {
        match input {
            Value::Vector(values) => Ok(values),
            Value::Scalar(_) => Err(EvalError::ExpectedVector(self.name.clone())),
        }
    }
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a function after everything already defined.
    ///
    /// # Errors
    /// Returns `ExportError::DuplicateFunctionName` if a function with the same name exists
    /// and `ExportError::UndefinedCallee` if a chain calls a function not defined yet.
    pub fn push(&mut self, function: Function) -> Result<(), ExportError> {
        if self.get(&function.name).is_some() {
            return Err(ExportError::DuplicateFunctionName(function.name));
        }
        if let Body::Chain(callees) = &function.body {
            if let Some(callee) = callees.iter().find(|callee| self.get(callee).is_none()) {
                return Err(ExportError::UndefinedCallee {
                    caller: function.name,
                    callee: callee.clone(),
                });
            }
        }
        self.functions.push(function);
        Ok(())
    }

    /// Appends all functions of `other`, keeping their order.
    pub fn extend(&mut self, other: Program) -> Result<(), ExportError> {
        other
            .functions
            .into_iter()
            .try_for_each(|function| self.push(function))
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }

    /// The function that was defined last, which is the one the export was requested for.
    pub fn entry(&self) -> Option<&Function> {
        self.functions.last()
    }

    /// Renders all definitions in order, separated by blank lines.
    pub fn render(&self, config: &ExportConfig) -> String {
        self.functions
            .iter()
            .map(|function| function.render(config))
            .join("\n")
    }

    /// Evaluates the entry function on `input`.
    ///
    /// # Errors
    /// Returns `EvalError` if the program is empty, an input has the wrong shape, or an
    /// expression indexes past the end of its input.
    pub fn eval(&self, input: &Value) -> Result<Value, EvalError> {
        let entry = self.entry().ok_or(EvalError::EmptyProgram)?;
        entry.apply(self, input)
    }

    /// Evaluates the function called `name` on `input`.
    pub fn call(&self, name: &str, input: &Value) -> Result<Value, EvalError> {
        let function = self
            .get(name)
            .ok_or_else(|| EvalError::UndefinedFunction(name.to_string()))?;
        function.apply(self, input)
    }

    /// Checks that every chained call targets a function defined earlier in the program.
    pub fn is_dependency_ordered(&self) -> bool {
        let mut defined = HashSet::new();
        for function in &self.functions {
            if let Body::Chain(callees) = &function.body {
                if !callees.iter().all(|callee| defined.contains(callee.as_str())) {
                    return false;
                }
            }
            defined.insert(function.name.as_str());
        }
        true
    }
}
