//! Post‑order rewriting of the syntax tree.
//!
//! A [`Fold`] supplies the substitution rule; the free `fold_*` walkers do the
//! traversal.  Every compound node has its children rebuilt first and is then
//! handed to [`Fold::fold_expression`], so the rule always sees children that
//! were already rewritten.  Both `unquote` splicing and macro expansion are
//! folds over call expressions.

use std::rc::Rc;

use crate::ast::{BlockStatement, Expression, Program, Statement};

pub trait Fold {
    type Error;

    /// Substitution rule, applied to each expression after its children.
    /// The default keeps the node.
    fn fold_expression(&mut self, expr: Expression) -> Result<Expression, Self::Error> {
        Ok(expr)
    }
}

pub fn fold_program<F: Fold + ?Sized>(folder: &mut F, program: Program) -> Result<Program, F::Error> {
    let statements = program
        .statements
        .into_iter()
        .map(|stmt| fold_statement(folder, stmt))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Program { statements })
}

pub fn fold_block<F: Fold + ?Sized>(
    folder: &mut F,
    block: BlockStatement,
) -> Result<BlockStatement, F::Error> {
    let statements = block
        .statements
        .into_iter()
        .map(|stmt| fold_statement(folder, stmt))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BlockStatement { statements })
}

pub fn fold_statement<F: Fold + ?Sized>(
    folder: &mut F,
    stmt: Statement,
) -> Result<Statement, F::Error> {
    let stmt = match stmt {
        Statement::Let { name, value } => Statement::Let {
            name,
            value: fold_expression(folder, value)?,
        },

        Statement::Return(value) => Statement::Return(fold_expression(folder, value)?),

        Statement::Expression(expr) => Statement::Expression(fold_expression(folder, expr)?),
    };

    Ok(stmt)
}

/// Rebuild `expr`'s children, then offer the rebuilt node to the folder.
pub fn fold_expression<F: Fold + ?Sized>(
    folder: &mut F,
    expr: Expression,
) -> Result<Expression, F::Error> {
    let rebuilt = match expr {
        Expression::Identifier(_) | Expression::IntegerLiteral(_) | Expression::BooleanLiteral(_) => {
            expr
        }

        Expression::Prefix { operator, right } => Expression::Prefix {
            operator,
            right: Box::new(fold_expression(folder, *right)?),
        },

        Expression::Infix {
            left,
            operator,
            right,
        } => Expression::Infix {
            left: Box::new(fold_expression(folder, *left)?),
            operator,
            right: Box::new(fold_expression(folder, *right)?),
        },

        Expression::If {
            condition,
            consequence,
            alternative,
        } => Expression::If {
            condition: Box::new(fold_expression(folder, *condition)?),
            consequence: fold_block(folder, consequence)?,
            alternative: alternative
                .map(|alt| fold_block(folder, alt))
                .transpose()?,
        },

        Expression::FunctionLiteral { parameters, body } => Expression::FunctionLiteral {
            parameters,
            body: Rc::new(fold_block(folder, Rc::unwrap_or_clone(body))?),
        },

        Expression::MacroLiteral { parameters, body } => Expression::MacroLiteral {
            parameters,
            body: Rc::new(fold_block(folder, Rc::unwrap_or_clone(body))?),
        },

        Expression::Call {
            function,
            arguments,
        } => Expression::Call {
            function: Box::new(fold_expression(folder, *function)?),
            arguments: arguments
                .into_iter()
                .map(|arg| fold_expression(folder, arg))
                .collect::<Result<Vec<_>, _>>()?,
        },
    };

    folder.fold_expression(rebuilt)
}
