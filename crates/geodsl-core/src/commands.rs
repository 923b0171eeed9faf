//! Static command registry
//!
//! Every command the language knows about is a `CommandId` variant carrying a
//! canonical name and a `Category`. The set is fixed at compile time; lookup
//! by name goes through a map built once on first use and is exact-case only.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Serialize;

use crate::errors::GeoDslError;

/// Classification tag used for filtering and documentation grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Algebra,
    Geometry,
    Statistics,
    Probability,
    Function,
    Conic,
    List,
    Vector,
    Transformation,
    Charts,
    Text,
    Logical,
    Scripting,
    Discrete,
    GeoGebra,
    Optimization,
    Cas,
    ThreeD,
    Financial,
    English,
}

impl Category {
    pub const ALL: [Category; 20] = [
        Category::Algebra,
        Category::Geometry,
        Category::Statistics,
        Category::Probability,
        Category::Function,
        Category::Conic,
        Category::List,
        Category::Vector,
        Category::Transformation,
        Category::Charts,
        Category::Text,
        Category::Logical,
        Category::Scripting,
        Category::Discrete,
        Category::GeoGebra,
        Category::Optimization,
        Category::Cas,
        Category::ThreeD,
        Category::Financial,
        Category::English,
    ];

    /// Upper-case tag name, e.g. `GEOMETRY`, `THREE_D`
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Algebra => "ALGEBRA",
            Category::Geometry => "GEOMETRY",
            Category::Statistics => "STATISTICS",
            Category::Probability => "PROBABILITY",
            Category::Function => "FUNCTION",
            Category::Conic => "CONIC",
            Category::List => "LIST",
            Category::Vector => "VECTOR",
            Category::Transformation => "TRANSFORMATION",
            Category::Charts => "CHARTS",
            Category::Text => "TEXT",
            Category::Logical => "LOGICAL",
            Category::Scripting => "SCRIPTING",
            Category::Discrete => "DISCRETE",
            Category::GeoGebra => "GEOGEBRA",
            Category::Optimization => "OPTIMIZATION",
            Category::Cas => "CAS",
            Category::ThreeD => "THREE_D",
            Category::Financial => "FINANCIAL",
            Category::English => "ENGLISH",
        }
    }

    /// Human-readable name of the command set
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Algebra => "Algebra",
            Category::Geometry => "Geometry",
            Category::Statistics => "Statistics",
            Category::Probability => "Probability",
            Category::Function => "Functions and Calculus",
            Category::Conic => "Conic",
            Category::List => "List",
            Category::Vector => "Vector and Matrix",
            Category::Transformation => "Transformation",
            Category::Charts => "Charts",
            Category::Text => "Text",
            Category::Logical => "Logical",
            Category::Scripting => "Scripting",
            Category::Discrete => "Discrete Math",
            Category::GeoGebra => "GeoGebra",
            Category::Optimization => "Optimization",
            Category::Cas => "CAS",
            Category::ThreeD => "3D",
            Category::Financial => "Financial",
            Category::English => "English",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Category {
    type Err = GeoDslError;

    /// Accepts the tag (`GEOMETRY`), the display name (`Geometry`) or either
    /// in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| {
                c.tag().eq_ignore_ascii_case(wanted) || c.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| GeoDslError::invalid_input(format!("Unknown category: {}", wanted)))
    }
}

macro_rules! command_catalog {
    ($($variant:ident => ($name:literal, $category:ident)),+ $(,)?) => {
        /// Identifier of a registered command
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum CommandId {
            $($variant),+
        }

        impl CommandId {
            /// Every registered command, in catalog order
            pub const ALL: &'static [CommandId] = &[$(CommandId::$variant),+];

            /// Canonical, case-sensitive command name
            pub fn name(&self) -> &'static str {
                match self {
                    $(CommandId::$variant => $name),+
                }
            }

            pub fn category(&self) -> Category {
                match self {
                    $(CommandId::$variant => Category::$category),+
                }
            }
        }
    };
}

command_catalog! {
    Mod => ("Mod", Algebra),
    Div => ("Div", Algebra),
    Min => ("Min", Algebra),
    Max => ("Max", Algebra),
    Lcm => ("LCM", Algebra),
    Gcd => ("GCD", Algebra),
    Expand => ("Expand", Algebra),
    Factor => ("Factor", Algebra),
    Simplify => ("Simplify", Algebra),

    Line => ("Line", Geometry),
    Ray => ("Ray", Geometry),
    AngularBisector => ("AngularBisector", Geometry),
    OrthogonalLine => ("OrthogonalLine", Geometry),
    Tangent => ("Tangent", Geometry),
    Segment => ("Segment", Geometry),
    Slope => ("Slope", Geometry),
    Angle => ("Angle", Geometry),
    Point => ("Point", Geometry),
    Midpoint => ("Midpoint", Geometry),
    LineBisector => ("LineBisector", Geometry),
    Intersect => ("Intersect", Geometry),
    Distance => ("Distance", Geometry),
    Length => ("Length", Geometry),
    Radius => ("Radius", Geometry),
    CircleArc => ("CircleArc", Geometry),
    Arc => ("Arc", Geometry),
    Sector => ("Sector", Geometry),
    Polygon => ("Polygon", Geometry),
    Area => ("Area", Geometry),
    Circumference => ("Circumference", Geometry),
    Perimeter => ("Perimeter", Geometry),
    Locus => ("Locus", Geometry),
    Centroid => ("Centroid", Geometry),

    Sum => ("Sum", Statistics),
    Mean => ("Mean", Statistics),
    Variance => ("Variance", Statistics),
    Sd => ("SD", Statistics),
    Median => ("Median", Statistics),
    Mode => ("Mode", Statistics),

    Random => ("Random", Probability),
    RandomNormal => ("RandomNormal", Probability),
    Normal => ("Normal", Probability),
    Binomial => ("Binomial", Probability),

    Root => ("Root", Function),
    Roots => ("Roots", Function),
    Polynomial => ("Polynomial", Function),
    Function => ("Function", Function),
    Extremum => ("Extremum", Function),
    Derivative => ("Derivative", Function),
    Integral => ("Integral", Function),
    Limit => ("Limit", Function),

    Ellipse => ("Ellipse", Conic),
    Hyperbola => ("Hyperbola", Conic),
    Conic => ("Conic", Conic),
    Circle => ("Circle", Conic),
    Parabola => ("Parabola", Conic),
    Focus => ("Focus", Conic),
    Center => ("Center", Conic),

    Sort => ("Sort", List),
    First => ("First", List),
    Last => ("Last", List),
    Take => ("Take", List),
    Element => ("Element", List),
    Append => ("Append", List),
    Join => ("Join", List),
    Sequence => ("Sequence", List),

    Vector => ("Vector", Vector),
    UnitVector => ("UnitVector", Vector),
    Invert => ("Invert", Vector),
    Transpose => ("Transpose", Vector),
    Determinant => ("Determinant", Vector),

    Mirror => ("Mirror", Transformation),
    Dilate => ("Dilate", Transformation),
    Rotate => ("Rotate", Transformation),
    Translate => ("Translate", Transformation),

    Text => ("Text", Text),

    If => ("If", Logical),
    CountIf => ("CountIf", Logical),
    Defined => ("Defined", Logical),

    SetColor => ("SetColor", Scripting),
    SetLineThickness => ("SetLineThickness", Scripting),
    SetPointSize => ("SetPointSize", Scripting),
    Delete => ("Delete", Scripting),
}

fn name_index() -> &'static HashMap<&'static str, CommandId> {
    static INDEX: OnceLock<HashMap<&'static str, CommandId>> = OnceLock::new();
    INDEX.get_or_init(|| CommandId::ALL.iter().map(|c| (c.name(), *c)).collect())
}

impl CommandId {
    /// Exact-case lookup by canonical name
    pub fn from_name(name: &str) -> Option<CommandId> {
        name_index().get(name).copied()
    }

    /// Signature hint for the command, e.g. `Line( <Point>, <Point> )`
    pub fn syntax(&self) -> String {
        let params: &[&str] = match self {
            CommandId::Point => &["<x>", "<y>"],
            CommandId::Line | CommandId::Segment | CommandId::Midpoint => &["<Point>", "<Point>"],
            CommandId::Circle => &["<Center>", "<Radius>"],
            CommandId::Intersect | CommandId::Distance => &["<Object>", "<Object>"],
            CommandId::Length => &["<Object>"],
            CommandId::Angle => &["<Point>", "<Vertex>", "<Point>"],
            CommandId::Sum | CommandId::Mean => &["<Number>", "<Number>", "..."],
            _ => &["..."],
        };
        format!("{}( {} )", self.name(), params.join(", "))
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up a command by exact name
pub fn get_by_name(name: &str) -> Option<CommandId> {
    CommandId::from_name(name)
}

/// Commands belonging to `category`, in catalog order
pub fn commands_in_category(category: Category) -> Vec<CommandId> {
    CommandId::ALL
        .iter()
        .copied()
        .filter(|c| c.category() == category)
        .collect()
}

/// Display name of a category's command set
pub fn sub_command_set_name(category: Category) -> &'static str {
    category.display_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_exact_case() {
        assert_eq!(get_by_name("Point"), Some(CommandId::Point));
        assert_eq!(get_by_name("point"), None);
        assert_eq!(get_by_name("POINT"), None);
        assert_eq!(get_by_name(" Point"), None);
    }

    #[test]
    fn test_every_catalog_entry_round_trips_through_lookup() {
        for cmd in CommandId::ALL {
            assert_eq!(CommandId::from_name(cmd.name()), Some(*cmd));
        }
    }

    #[test]
    fn test_names_are_unique() {
        assert_eq!(name_index().len(), CommandId::ALL.len());
    }

    #[test]
    fn test_categories() {
        assert_eq!(CommandId::Circle.category(), Category::Conic);
        assert_eq!(CommandId::Sum.category(), Category::Statistics);
        assert_eq!(CommandId::Gcd.name(), "GCD");
        assert!(commands_in_category(Category::Cas).is_empty());
        assert_eq!(commands_in_category(Category::Text), vec![CommandId::Text]);
    }

    #[test]
    fn test_category_display_names() {
        assert_eq!(sub_command_set_name(Category::Function), "Functions and Calculus");
        assert_eq!(sub_command_set_name(Category::Vector), "Vector and Matrix");
        assert_eq!(sub_command_set_name(Category::Discrete), "Discrete Math");
        assert_eq!(sub_command_set_name(Category::ThreeD), "3D");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("GEOMETRY".parse::<Category>().unwrap(), Category::Geometry);
        assert_eq!("geometry".parse::<Category>().unwrap(), Category::Geometry);
        assert_eq!("Vector and Matrix".parse::<Category>().unwrap(), Category::Vector);
        assert_eq!("three_d".parse::<Category>().unwrap(), Category::ThreeD);
        assert!("Astrology".parse::<Category>().is_err());
    }

    #[test]
    fn test_syntax() {
        assert_eq!(CommandId::Line.syntax(), "Line( <Point>, <Point> )");
        assert_eq!(CommandId::Polygon.syntax(), "Polygon( ... )");
    }
}
