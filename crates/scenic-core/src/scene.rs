//! Scene data model.
//!
//! A [`Scene`] is the complete diagram state handed to the layout and scoring
//! operations: a canvas, an ordered list of [`DiagramObject`]s and an ordered
//! list of [`Relationship`]s between them. Serialization follows the JSON
//! shape shared with the editor front end (`canvas_width`, `object_type`,
//! `source_id`, ...).
//!
//! Insertion order is significant and preserved: every algorithm iterates
//! objects and relationships in the order they appear here.

mod index;
mod property;

pub use index::{Endpoints, SceneIndex, StructureError};
pub use property::{MASS, PropertyValue, Properties, ROTATION};

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Point, Size};

/// Root aggregate describing one diagram.
///
/// # Examples
///
/// ```
/// # use scenic_core::geometry::{Point, Size};
/// # use scenic_core::scene::{DiagramObject, Relationship, Scene};
/// let scene = Scene::new("circuit-1", Size::new(800.0, 600.0))
///     .with_domain("electrical")
///     .with_object(DiagramObject::new("bat", "battery", Point::new(100.0, 100.0), Size::new(60.0, 40.0)))
///     .with_object(DiagramObject::new("r1", "resistor", Point::new(300.0, 100.0), Size::new(80.0, 30.0)))
///     .with_relationship(Relationship::new("w1", "connects", "bat", "r1"));
///
/// assert!(scene.validate().is_ok());
/// assert_eq!(scene.objects().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    id: String,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    diagram_type: String,
    #[serde(default)]
    title: String,
    canvas_width: f64,
    canvas_height: f64,
    #[serde(default)]
    objects: Vec<DiagramObject>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

impl Scene {
    /// Creates an empty scene with the given canvas size
    pub fn new(id: impl Into<String>, canvas: Size) -> Self {
        Self {
            id: id.into(),
            domain: String::new(),
            diagram_type: String::new(),
            title: String::new(),
            canvas_width: canvas.width(),
            canvas_height: canvas.height(),
            objects: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Sets the domain tag (for example `electrical` or `physics`)
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Sets the diagram type tag
    pub fn with_diagram_type(mut self, diagram_type: impl Into<String>) -> Self {
        self.diagram_type = diagram_type.into();
        self
    }

    /// Sets the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Appends an object
    pub fn with_object(mut self, object: DiagramObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Appends a relationship
    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Scene identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Domain tag, empty when unset
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Diagram type tag, empty when unset
    pub fn diagram_type(&self) -> &str {
        &self.diagram_type
    }

    /// Human readable title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the canvas dimensions
    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    /// Returns the canvas rectangle, anchored at the origin
    pub fn canvas_bounds(&self) -> Bounds {
        Bounds::new_from_top_left(Point::default(), self.canvas_size())
    }

    /// Objects in insertion order
    pub fn objects(&self) -> &[DiagramObject] {
        &self.objects
    }

    /// Mutable access to the objects, for layout passes that move them
    pub fn objects_mut(&mut self) -> &mut [DiagramObject] {
        &mut self.objects
    }

    /// Relationships in insertion order
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Checks the structural invariants of the scene.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] describing the first violation found.
    pub fn validate(&self) -> Result<(), StructureError> {
        SceneIndex::new(self).map(|_| ())
    }

    /// Builds the id index, validating the scene on the way
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] describing the first violation found.
    pub fn index(&self) -> Result<SceneIndex<'_>, StructureError> {
        SceneIndex::new(self)
    }
}

/// Center position of an object. `z` is a layering hint carried through
/// untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// Extent of an object. `depth` is carried through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub depth: f64,
}

/// One placed component of a diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramObject {
    id: String,
    object_type: String,
    position: Position,
    dimensions: Dimensions,
    #[serde(default)]
    label: String,
    #[serde(default)]
    properties: Properties,
    #[serde(default)]
    style: Properties,
}

impl DiagramObject {
    /// Creates an object centered at `center` with the given size
    pub fn new(
        id: impl Into<String>,
        object_type: impl Into<String>,
        center: Point,
        size: Size,
    ) -> Self {
        Self {
            id: id.into(),
            object_type: object_type.into(),
            position: Position {
                x: center.x(),
                y: center.y(),
                z: 0.0,
            },
            dimensions: Dimensions {
                width: size.width(),
                height: size.height(),
                depth: 0.0,
            },
            label: String::new(),
            properties: Properties::new(),
            style: Properties::new(),
        }
    }

    /// Sets the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Adds or replaces a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds or replaces a style hint
    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    /// Unique object identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Object type, used for style grouping and physics rules
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Display label, empty when unset
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Domain properties such as `rotation` or `mass`
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Rendering hints; layout and scoring ignore them
    pub fn style(&self) -> &Properties {
        &self.style
    }

    /// Full position including the layering coordinate
    pub fn position(&self) -> Position {
        self.position
    }

    /// Full dimensions including depth
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Center of the object in the layout plane
    pub fn center(&self) -> Point {
        Point::new(self.position.x, self.position.y)
    }

    /// Moves the object in the layout plane, leaving `z` untouched
    pub fn set_center(&mut self, center: Point) {
        self.position.x = center.x();
        self.position.y = center.y();
    }

    /// Width and height of the object
    pub fn size(&self) -> Size {
        Size::new(self.dimensions.width, self.dimensions.height)
    }

    /// Axis-aligned rectangle covered by the object
    pub fn bounds(&self) -> Bounds {
        self.center().to_bounds(self.size())
    }

    /// Numeric property value, if present and numeric
    pub fn number_property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(PropertyValue::as_number)
    }

    /// Rotation in degrees, when the object carries one
    pub fn rotation(&self) -> Option<f64> {
        self.number_property(ROTATION)
    }

    /// Mass, when the object carries a numeric one
    pub fn mass(&self) -> Option<f64> {
        self.number_property(MASS)
    }
}

/// A logical connection between two objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    id: String,
    #[serde(default, alias = "type")]
    relationship_type: String,
    source_id: String,
    target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ideal_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl Relationship {
    /// Creates a relationship from `source_id` to `target_id`
    pub fn new(
        id: impl Into<String>,
        relationship_type: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            relationship_type: relationship_type.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            ideal_length: None,
            label: None,
        }
    }

    /// Overrides the preferred edge length used by the layout springs
    pub fn with_ideal_length(mut self, length: f64) -> Self {
        self.ideal_length = Some(length);
        self
    }

    /// Sets the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Relationship identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Relationship type (`connects`, `force`, ...)
    pub fn relationship_type(&self) -> &str {
        &self.relationship_type
    }

    /// Id of the source object
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Id of the target object
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Preferred edge length, when overridden
    pub fn ideal_length(&self) -> Option<f64> {
        self.ideal_length
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
