//! Console calculator: reads `<number> <op> <number>` lines and prints the
//! result until the user answers `q` or `Q`.

use std::fmt;
use std::io::{self, BufRead, Write};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,

    #[error("expected a number at {0:?}")]
    InvalidNumber(String),

    #[error("expected an operator after the first number")]
    MissingOperator,

    #[error("unknown operator '{0}', expected one of + - * / ^")]
    UnknownOperator(char),

    #[error("unexpected trailing input {0:?}")]
    TrailingInput(String),

    #[error("Cannot divide by zero.")]
    DivideByZero,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Op {
    pub fn from_char(c: char) -> Result<Self, CalcError> {
        match c {
            '+' => Ok(Op::Add),
            '-' => Ok(Op::Sub),
            '*' => Ok(Op::Mul),
            '/' => Ok(Op::Div),
            '^' => Ok(Op::Pow),
            other => Err(CalcError::UnknownOperator(other)),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
            Op::Pow => '^',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Expression {
    pub lhs: f64,
    pub op: Op,
    pub rhs: f64,
}

impl Expression {
    pub fn evaluate(&self) -> Result<f64, CalcError> {
        let Self { lhs, op, rhs } = *self;
        match op {
            Op::Add => Ok(lhs + rhs),
            Op::Sub => Ok(lhs - rhs),
            Op::Mul => Ok(lhs * rhs),
            Op::Div if rhs == 0.0 => Err(CalcError::DivideByZero),
            Op::Div => Ok(lhs / rhs),
            Op::Pow => Ok(lhs.powf(rhs)),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

/// Splits a leading floating point literal (optional sign, digits, point,
/// exponent) off `input`.
fn take_number(input: &str) -> Result<(f64, &str), CalcError> {
    let bytes = input.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if end == digits_start {
        return Err(CalcError::InvalidNumber(input.to_string()));
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    let literal = &input[..end];
    let value = literal
        .parse::<f64>()
        .map_err(|_| CalcError::InvalidNumber(literal.to_string()))?;
    Ok((value, &input[end..]))
}

pub fn parse_expression(line: &str) -> Result<Expression, CalcError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CalcError::Empty);
    }

    let (lhs, rest) = take_number(line)?;
    let rest = rest.trim_start();
    let op_char = rest.chars().next().ok_or(CalcError::MissingOperator)?;
    let op = Op::from_char(op_char)?;

    let (rhs, rest) = take_number(rest[op_char.len_utf8()..].trim_start())?;
    let rest = rest.trim();
    if !rest.is_empty() {
        return Err(CalcError::TrailingInput(rest.to_string()));
    }

    Ok(Expression { lhs, op, rhs })
}

/// Result line for one input line, as shown to the user.
pub fn respond(line: &str) -> String {
    match parse_expression(line) {
        Ok(expr) => match expr.evaluate() {
            Ok(value) => format!("{expr} = {value}"),
            Err(e) => e.to_string(),
        },
        Err(e) => format!("Invalid expression: {e}"),
    }
}

fn wants_quit(answer: &str) -> bool {
    matches!(answer.trim_start().chars().next(), Some('q' | 'Q'))
}

/// Runs the prompt loop until the user quits or input ends.
pub fn run_session<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<()> {
    let mut line = String::new();

    loop {
        writeln!(output, "Enter expression")?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let response = respond(&line);
        log::debug!("{:?} -> {response}", line.trim());
        writeln!(output, "{response}")?;

        writeln!(
            output,
            "Press anything to enter another expression. Press q or Q to quit."
        )?;
        line.clear();
        if input.read_line(&mut line)? == 0 || wants_quit(&line) {
            break;
        }
    }

    writeln!(output, "Program Finished")?;
    output.flush()
}
