//! # Bracketed text format
//!
//! Every layer prints as a bracketed, comma-delimited list of the layer
//! beneath and its own scalar:
//!
//! ```text
//! complex               [re,im]
//! FreeCoordinates       [ζ₀,ζ₁,…]
//! HeisenbergStructure   [<free>,r]
//! HyperbolicStructure   [<heisenberg>,height]
//! Point                 [<hyperbolic>,<dependent>]
//! ```
//!
//! Parsing a [`Point`] reads the dependent coordinate for shape only and
//! recomputes it from the parsed scalars.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex;
use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::coordinate::Scalar;
use crate::dimension::Dimension;
use crate::error::ParseError;
use crate::point::Point;
use crate::structure::{HeisenbergStructure, HyperbolicStructure};
use crate::zeta::FreeCoordinates;

// ─────────────────────────────────────────────
// Display
// ─────────────────────────────────────────────

fn write_complex<S: Scalar>(f: &mut fmt::Formatter<'_>, z: &Complex<S>) -> fmt::Result {
    write!(f, "[{},{}]", z.re, z.im)
}

impl<D: Dimension, S: Scalar> fmt::Display for FreeCoordinates<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, z) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write_complex(f, z)?;
        }
        f.write_str("]")
    }
}

impl<D: Dimension, S: Scalar> fmt::Display for HeisenbergStructure<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.free(), self.r())
    }
}

impl<D: Dimension, S: Scalar> fmt::Display for HyperbolicStructure<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.heisenberg(), self.height())
    }
}

impl<D: Dimension, S: Scalar> fmt::Display for Point<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},", self.structure())?;
        write_complex(f, &self.dependent())?;
        f.write_str("]")
    }
}

// ─────────────────────────────────────────────
// Syntax tree
// ─────────────────────────────────────────────

#[derive(Parser)]
#[grammar = "src/coords.pest"]
struct CoordParser;

#[derive(Debug)]
enum Node<'a> {
    Atom { text: &'a str, offset: usize },
    List { items: Vec<Node<'a>>, offset: usize },
}

impl<'a> Node<'a> {
    /// Parse a whole document into a tree.
    fn parse(input: &'a str) -> Result<Self, ParseError> {
        let root = CoordParser::parse(Rule::document, input)
            .map_err(parse_error)?
            .next()
            .and_then(|document| document.into_inner().next())
            .ok_or(ParseError::Malformed { offset: 0 })?;
        Ok(Self::from_pair(root))
    }

    fn from_pair(pair: Pair<'a, Rule>) -> Self {
        let offset = pair.as_span().start();
        match pair.as_rule() {
            Rule::list => Node::List {
                items: pair.into_inner().map(Self::from_pair).collect(),
                offset,
            },
            _ => Node::Atom {
                text: pair.as_str(),
                offset,
            },
        }
    }

    fn list(&self, expected: usize) -> Result<&[Node<'a>], ParseError> {
        match self {
            Node::List { items, .. } if items.len() == expected => Ok(items),
            Node::List { items, .. } => Err(ParseError::WrongElementCount {
                expected,
                got: items.len(),
            }),
            Node::Atom { offset, .. } => Err(ParseError::Malformed { offset: *offset }),
        }
    }

    fn scalar<S: Scalar>(&self) -> Result<S, ParseError> {
        match self {
            Node::Atom { text, .. } => text
                .parse::<S>()
                .map_err(|_| ParseError::InvalidNumber((*text).to_string())),
            Node::List { offset, .. } => Err(ParseError::Malformed { offset: *offset }),
        }
    }

    fn complex<S: Scalar>(&self) -> Result<Complex<S>, ParseError> {
        let parts = self.list(2)?;
        Ok(Complex::new(parts[0].scalar()?, parts[1].scalar()?))
    }
}

fn parse_error(e: pest::error::Error<Rule>) -> ParseError {
    let offset = match e.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    match &e.variant {
        // A complete value followed by something other than end of input.
        ErrorVariant::ParsingError { positives, .. } if positives.contains(&Rule::EOI) => {
            ParseError::TrailingInput { offset }
        }
        _ => ParseError::Malformed { offset },
    }
}

// ─────────────────────────────────────────────
// FromStr
// ─────────────────────────────────────────────

trait FromNode: Sized {
    fn from_node(node: &Node<'_>) -> Result<Self, ParseError>;
}

impl<D: Dimension, S: Scalar> FromNode for FreeCoordinates<D, S> {
    fn from_node(node: &Node<'_>) -> Result<Self, ParseError> {
        let items = node.list(D::FREE_COUNT)?;
        let mut free = Self::zero();
        for (z, item) in free.as_mut_slice().iter_mut().zip(items) {
            *z = item.complex()?;
        }
        Ok(free)
    }
}

impl<D: Dimension, S: Scalar> FromNode for HeisenbergStructure<D, S> {
    fn from_node(node: &Node<'_>) -> Result<Self, ParseError> {
        let items = node.list(2)?;
        Ok(Self::new(FreeCoordinates::from_node(&items[0])?, items[1].scalar()?))
    }
}

impl<D: Dimension, S: Scalar> FromNode for HyperbolicStructure<D, S> {
    fn from_node(node: &Node<'_>) -> Result<Self, ParseError> {
        let items = node.list(2)?;
        Ok(Self::new(HeisenbergStructure::from_node(&items[0])?, items[1].scalar()?))
    }
}

impl<D: Dimension, S: Scalar> FromNode for Point<D, S> {
    fn from_node(node: &Node<'_>) -> Result<Self, ParseError> {
        let items = node.list(2)?;
        let structure = HyperbolicStructure::from_node(&items[0])?;
        items[1].complex::<S>()?;
        Ok(Point::from_structure(structure))
    }
}

macro_rules! from_str_via_node {
    ($($ty:ident),*) => {$(
        impl<D: Dimension, S: Scalar> FromStr for $ty<D, S> {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_node(&Node::parse(s)?)
            }
        }
    )*};
}

from_str_via_node!(FreeCoordinates, HeisenbergStructure, HyperbolicStructure, Point);

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
