use std::str::FromStr;

use json::JsonValue;

use super::{generator, spray::spray, Mesh};
use crate::{
    data::prelude::*,
    error::{GeometryError, Result},
};

/// Generator selected by the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshType {
    Polygon,
    Star,
    Rectangle,
}

impl FromStr for MeshType {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "polygon" => Ok(Self::Polygon),
            "star" => Ok(Self::Star),
            "rectangle" => Ok(Self::Rectangle),
            other => Err(GeometryError::MalformedSpec(format!("unknown mesh type `{other}`"))),
        }
    }
}

/// Construction-time description of a mesh.
///
/// Either names a generator through `mesh_type`, supplies raw `vertices`, or
/// both; supplied arrays replace what the generator would compute.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSpec {
    pub id: Option<String>,
    pub mesh_type: Option<MeshType>,
    pub vertices: Option<Vec<f32>>,
    pub triangle_indices: Option<Vec<u16>>,
    pub polygon_indices: Option<Vec<Vec<u16>>>,
    pub bounds: Option<Rect>,
    /// `effect: "spray"`.
    pub spray: bool,
    pub sides: usize,
    pub has_flat_top: bool,
    pub points: usize,
    pub ratio: f32,
    pub inner_ring: usize,
    pub rings: usize,
}

impl Default for MeshSpec {
    fn default() -> Self {
        Self {
            id: None,
            mesh_type: None,
            vertices: None,
            triangle_indices: None,
            polygon_indices: None,
            bounds: None,
            spray: false,
            sides: 6,
            has_flat_top: false,
            points: 5,
            ratio: 0.5,
            inner_ring: 4,
            rings: 3,
        }
    }
}

/// Square used by `type: "rectangle"` when no `bounds` is given.
const DEFAULT_RECTANGLE: Rect = Rect { left: -1.0, top: 1.0, right: 1.0, bottom: -1.0 };

impl MeshSpec {
    pub fn parse(text: &str) -> Result<Self> {
        let value = json::parse(text).map_err(|e| GeometryError::MalformedSpec(e.to_string()))?;
        Self::from_json(&value)
    }

    pub fn from_json(value: &JsonValue) -> Result<Self> {
        if !value.is_object() {
            return Err(GeometryError::MalformedSpec("mesh specification must be an object".to_string()));
        }

        let default = Self::default();
        let spray = match read_str(value, "effect")? {
            None => false,
            Some("spray") => true,
            Some(other) => return Err(GeometryError::MalformedSpec(format!("unknown effect `{other}`"))),
        };

        let spec = Self {
            id: read_str(value, "id")?.map(str::to_string),
            mesh_type: read_str(value, "type")?.map(MeshType::from_str).transpose()?,
            vertices: read_list(value, "vertices", JsonValue::as_f32, "an array of numbers")?,
            triangle_indices: read_list(value, "triangleIndices", JsonValue::as_u16, "an array of 16-bit indices")?,
            polygon_indices: field(value, "polygonIndices")
                .map(|polygons| {
                    if !polygons.is_array() {
                        return Err(wrong_type("polygonIndices", "an array of index arrays"));
                    }
                    polygons
                        .members()
                        .map(|polygon| {
                            list(polygon, JsonValue::as_u16)
                                .ok_or_else(|| wrong_type("polygonIndices", "an array of index arrays"))
                        })
                        .collect::<Result<Vec<_>>>()
                })
                .transpose()?,
            bounds: read_rect(value, "bounds")?,
            spray,
            sides: read_usize(value, "sides")?.unwrap_or(default.sides),
            has_flat_top: read_bool(value, "hasFlatTop")?.unwrap_or(default.has_flat_top),
            points: read_usize(value, "points")?.unwrap_or(default.points),
            ratio: read_f32(value, "ratio")?.unwrap_or(default.ratio),
            inner_ring: read_usize(value, "innerRing")?.unwrap_or(default.inner_ring),
            rings: read_usize(value, "rings")?.unwrap_or(default.rings),
        };

        spec.warn_ignored(value);
        Ok(spec)
    }

    fn warn_ignored(&self, value: &JsonValue) {
        let ignored: &[&str] = match self.mesh_type {
            Some(MeshType::Polygon) => &["points", "ratio"],
            Some(MeshType::Star) => &["sides", "hasFlatTop"],
            Some(MeshType::Rectangle) | None => &["sides", "hasFlatTop", "points", "ratio"],
        };
        let spray_only: &[&str] = if self.spray { &[] } else { &["innerRing", "rings"] };

        for key in ignored.iter().chain(spray_only) {
            if value.has_key(key) {
                log::warn!("mesh {:?}: field `{}` is ignored", self.id.as_deref().unwrap_or("<anonymous>"), key);
            }
        }
    }

    pub fn build(&self) -> Result<Mesh> {
        let generated = match self.mesh_type {
            Some(MeshType::Polygon) => Some(generator::regular_polygon(self.sides, self.has_flat_top)?),
            Some(MeshType::Star) => Some(generator::star(self.points, self.ratio)?),
            Some(MeshType::Rectangle) => Some(generator::rectangle(&self.bounds.unwrap_or(DEFAULT_RECTANGLE))?),
            None => None,
        };

        let vertices = match (&self.vertices, &generated) {
            (Some(raw), _) => VertexBuffer::from_raw(raw.clone())?,
            (None, Some(mesh)) => mesh.vertices().clone(),
            (None, None) => {
                return Err(GeometryError::MalformedSpec(
                    "mesh specification needs a `type` or `vertices`".to_string(),
                ))
            }
        };
        let indices = match (&self.triangle_indices, &generated) {
            (Some(raw), _) => Some(IndexTupleBuffer::from_raw(raw.clone())?),
            (None, Some(mesh)) => mesh.indices().cloned(),
            (None, None) => None,
        };

        let mut mesh = match &self.polygon_indices {
            Some(polygons) => Mesh::multi_polygon(vertices, indices, polygons.clone())?,
            None => Mesh::polygon(vertices, indices)?,
        };
        if let Some(bounds) = self.bounds {
            mesh = mesh.with_bounds(bounds);
        }
        if self.spray {
            mesh = spray(&mesh, self.inner_ring, self.rings)?;
        }
        if let Some(id) = &self.id {
            mesh = mesh.with_id(id.clone());
        }

        log::debug!(
            "built mesh {:?}: {} vertices, {} instances",
            self.id,
            mesh.vertices().len(),
            mesh.instance_count()
        );
        Ok(mesh)
    }
}

pub(crate) fn field<'a>(value: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    let field = &value[key];
    (!field.is_null()).then_some(field)
}

fn wrong_type(key: &str, expected: &str) -> GeometryError {
    GeometryError::MalformedSpec(format!("`{key}` must be {expected}"))
}

fn list<T>(value: &JsonValue, item: fn(&JsonValue) -> Option<T>) -> Option<Vec<T>> {
    if !value.is_array() {
        return None;
    }
    value.members().map(item).collect()
}

fn read_list<T>(
    value: &JsonValue,
    key: &str,
    item: fn(&JsonValue) -> Option<T>,
    expected: &str,
) -> Result<Option<Vec<T>>> {
    field(value, key)
        .map(|list_value| list(list_value, item).ok_or_else(|| wrong_type(key, expected)))
        .transpose()
}

pub(crate) fn read_str<'a>(value: &'a JsonValue, key: &str) -> Result<Option<&'a str>> {
    field(value, key)
        .map(|v| v.as_str().ok_or_else(|| wrong_type(key, "a string")))
        .transpose()
}

pub(crate) fn read_f32(value: &JsonValue, key: &str) -> Result<Option<f32>> {
    field(value, key)
        .map(|v| v.as_f32().ok_or_else(|| wrong_type(key, "a number")))
        .transpose()
}

pub(crate) fn read_usize(value: &JsonValue, key: &str) -> Result<Option<usize>> {
    field(value, key)
        .map(|v| v.as_usize().ok_or_else(|| wrong_type(key, "a non-negative integer")))
        .transpose()
}

pub(crate) fn read_bool(value: &JsonValue, key: &str) -> Result<Option<bool>> {
    field(value, key)
        .map(|v| v.as_bool().ok_or_else(|| wrong_type(key, "a boolean")))
        .transpose()
}

/// `[x, y]`.
pub(crate) fn read_point(value: &JsonValue, key: &str) -> Result<Option<Point>> {
    field(value, key).map(|v| point(v).ok_or_else(|| wrong_type(key, "an [x, y] pair"))).transpose()
}

pub(crate) fn point(value: &JsonValue) -> Option<Point> {
    match list(value, JsonValue::as_f32)?.as_slice() {
        &[x, y] => Some(Point::new(x, y)),
        _ => None,
    }
}

/// `{ left, top, right, bottom }`, normalized.
pub(crate) fn read_rect(value: &JsonValue, key: &str) -> Result<Option<Rect>> {
    field(value, key)
        .map(|v| -> Result<Rect> {
            let side = |name: &str| v[name].as_f32().ok_or_else(|| wrong_type(key, "a {left, top, right, bottom} object"));
            let mut rect = Rect::new(side("left")?, side("top")?, side("right")?, side("bottom")?);
            rect.normalize();
            Ok(rect)
        })
        .transpose()
}
