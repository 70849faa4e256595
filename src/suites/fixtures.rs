//! Small plurified classes the object suite builds and inspects.

use plur_core::{Interface, Object};

use crate::Plurified;

/// Classes that can be flattened into a plain property bag and rebuilt from one.
pub trait Portable {
    fn to_obj(&self) -> Object;
}

/// Marker for [`Portable`].
pub enum IPortable {}

impl Interface for IPortable {
    const NAMEPATH: &'static str = "plur/model/IPortable";
}

#[derive(Debug, Plurified)]
#[plur(namepath = "plur-tests/fixtures/Shape")]
pub struct Shape {
    pub sides: i64,
}

#[derive(Debug, Plurified)]
#[plur(namepath = "plur-tests/fixtures/Square", extends = Shape, implements(IPortable))]
pub struct Square {
    pub shape: Shape,
    pub side: f64,
}

impl Square {
    pub fn new(side: f64) -> Self {
        Self {
            shape: Shape { sides: 4 },
            side,
        }
    }
}

impl Portable for Square {
    fn to_obj(&self) -> Object {
        Object::new().with("sides", self.shape.sides).with("side", self.side)
    }
}

/// A square that never declared a namepath of its own.
#[derive(Debug, Plurified)]
#[plur(extends = Square)]
pub struct Tile {
    pub square: Square,
}
