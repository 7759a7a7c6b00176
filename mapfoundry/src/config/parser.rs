//! INI parsing logic for converting `Ini` → `ProjectConfig`.
//!
//! This is the single place where INI section and key names are mapped to
//! descriptor fields. Entity sections use a `kind name` heading, e.g.
//! `[table addr]`, `[layer roads]`, `[join 1]`, `[sort 1]`,
//! `[output Service Area]`. Unknown sections and keys are ignored for
//! forward compatibility.

use std::path::{Path, PathBuf};

use ini::{Ini, Properties};

use super::file::{ConfigError, LegendConfig, ProjectConfig};
use crate::descriptor::{Extent, InsertPosition, Layer, OutputSpec, SortRule, SpatialJoinSpec, Table};

/// Default author when the config does not name one.
const DEFAULT_AUTHOR: &str = "Unknown Author";

/// Parse an `Ini` object into a `ProjectConfig`.
pub(super) fn parse_ini(ini: &Ini) -> Result<ProjectConfig, ConfigError> {
    let project = ini.section(Some("project"));

    let mut missing = Vec::new();
    let name = require(project, "name", &mut missing);
    let base_path = require(project, "base_path", &mut missing);
    let template = require(project, "template", &mut missing);
    if !missing.is_empty() {
        return Err(ConfigError::MissingFields {
            section: "project".to_string(),
            fields: missing,
        });
    }

    let base_path = PathBuf::from(base_path);
    // Tables without an explicit directory resolve against the project's
    // data path.
    let data_path = base_path.join("Data");

    let mut config = ProjectConfig {
        name,
        author: optional(project, "author").unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        description: optional(project, "description"),
        base_path,
        template: PathBuf::from(template),
        locator: optional(project, "locator").map(PathBuf::from),
        header_prefix: optional(project, "header_prefix"),
        output_prefix: optional(project, "output_prefix"),
        legend: parse_legend(ini)?,
        tables: Vec::new(),
        layers: Vec::new(),
        spatial_joins: Vec::new(),
        sort_rules: Vec::new(),
        outputs: Vec::new(),
    };

    for (section, props) in ini.iter() {
        let Some(section) = section else { continue };
        if let Some(id) = section.strip_prefix("table ") {
            config
                .tables
                .push(parse_table(section, id.trim(), props, &data_path)?);
        } else if let Some(id) = section.strip_prefix("layer ") {
            config.layers.push(parse_layer(section, id.trim(), props)?);
        } else if section.starts_with("join ") {
            config.spatial_joins.push(parse_join(section, props)?);
        } else if section.starts_with("sort ") {
            config.sort_rules.push(parse_sort(section, props)?);
        } else if let Some(id) = section.strip_prefix("output ") {
            config.outputs.push(parse_output(section, id.trim(), props)?);
        }
    }

    Ok(config)
}

fn parse_legend(ini: &Ini) -> Result<LegendConfig, ConfigError> {
    let mut legend = LegendConfig::default();
    let Some(section) = ini.section(Some("legend")) else {
        return Ok(legend);
    };

    if let Some(v) = section.get("x") {
        legend.x = parse_f64("legend", "x", v)?;
    }
    if let Some(v) = section.get("y") {
        legend.y = parse_f64("legend", "y", v)?;
    }
    if let Some(v) = section.get("style") {
        let v = v.trim();
        if !v.is_empty() {
            legend.style = v.to_string();
        }
    }
    Ok(legend)
}

fn parse_table(
    section: &str,
    name: &str,
    props: &Properties,
    data_path: &Path,
) -> Result<Table, ConfigError> {
    if name.is_empty() {
        return Err(missing(section, &["name"]));
    }

    // The data file is `{name}{extension}` under either the explicit
    // directory or the project data path. Without an extension the name
    // is assumed to address a dataset directly.
    let extension = props.get("extension").map(str::trim).unwrap_or("");
    let file_name = format!("{}{}", name, extension);
    let dir = match props.get("path").map(str::trim).filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => data_path.to_path_buf(),
    };

    let mut table = Table::new(name, dir.join(file_name));
    if let Some(v) = props.get("join") {
        table.join = parse_bool(section, "join", v)?;
    }
    if let Some(v) = props.get("geocode") {
        table.geocode = parse_bool(section, "geocode", v)?;
    }
    if let Some(v) = props.get("visible") {
        table.visible = parse_bool(section, "visible", v)?;
    }
    if let Some(v) = non_empty(props, "geocoded_layer_name") {
        table.geocoded_layer_name = v;
    }
    table.geocode_layer_style = non_empty(props, "geocode_layer_style");
    Ok(table)
}

fn parse_layer(section: &str, name: &str, props: &Properties) -> Result<Layer, ConfigError> {
    let mut fields = Vec::new();
    if name.is_empty() {
        fields.push("name".to_string());
    }
    let path = expect(props, "path", &mut fields);
    if !fields.is_empty() {
        return Err(ConfigError::MissingFields {
            section: section.to_string(),
            fields,
        });
    }

    let mut layer = Layer::new(name, path);
    layer.style = non_empty(props, "style");
    layer.definition_query = non_empty(props, "definition_query");
    if let Some(v) = props.get("visible") {
        layer.visible = parse_bool(section, "visible", v)?;
    }
    Ok(layer)
}

fn parse_join(section: &str, props: &Properties) -> Result<SpatialJoinSpec, ConfigError> {
    let mut fields = Vec::new();
    let layer_name = expect(props, "layer_name", &mut fields);
    let layer_path = expect(props, "layer_path", &mut fields);
    let table_name = expect(props, "table_name", &mut fields);
    if !fields.is_empty() {
        return Err(ConfigError::MissingFields {
            section: section.to_string(),
            fields,
        });
    }

    Ok(SpatialJoinSpec {
        layer_name,
        layer_path: PathBuf::from(layer_path),
        table_name,
        layer_style: non_empty(props, "layer_style"),
    })
}

fn parse_sort(section: &str, props: &Properties) -> Result<SortRule, ConfigError> {
    let mut fields = Vec::new();
    let move_layer_name = expect(props, "move", &mut fields);
    let ref_layer_name = expect(props, "ref", &mut fields);
    let position = expect(props, "position", &mut fields);
    if !fields.is_empty() {
        return Err(ConfigError::MissingFields {
            section: section.to_string(),
            fields,
        });
    }

    let insert_position =
        position
            .parse::<InsertPosition>()
            .map_err(|reason| ConfigError::InvalidValue {
                section: section.to_string(),
                key: "position".to_string(),
                value: position.clone(),
                reason,
            })?;

    Ok(SortRule {
        move_layer_name,
        ref_layer_name,
        insert_position,
    })
}

fn parse_output(section: &str, name: &str, props: &Properties) -> Result<OutputSpec, ConfigError> {
    let mut fields = Vec::new();
    if name.is_empty() {
        fields.push("name".to_string());
    }
    let xmin = expect(props, "xmin", &mut fields);
    let ymin = expect(props, "ymin", &mut fields);
    let xmax = expect(props, "xmax", &mut fields);
    let ymax = expect(props, "ymax", &mut fields);
    if !fields.is_empty() {
        return Err(ConfigError::MissingFields {
            section: section.to_string(),
            fields,
        });
    }

    Ok(OutputSpec {
        name: name.to_string(),
        extent: Extent {
            xmin: parse_f64(section, "xmin", &xmin)?,
            ymin: parse_f64(section, "ymin", &ymin)?,
            xmax: parse_f64(section, "xmax", &xmax)?,
            ymax: parse_f64(section, "ymax", &ymax)?,
        },
    })
}

/// Fetch a required key from `[project]`, recording it when absent.
fn require(section: Option<&Properties>, key: &str, missing: &mut Vec<String>) -> String {
    match section
        .and_then(|s| s.get(key))
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        Some(v) => v.to_string(),
        None => {
            missing.push(key.to_string());
            String::new()
        }
    }
}

/// Fetch a required key from an entity section, recording it when absent.
fn expect(props: &Properties, key: &str, missing: &mut Vec<String>) -> String {
    match non_empty(props, key) {
        Some(v) => v,
        None => {
            missing.push(key.to_string());
            String::new()
        }
    }
}

fn optional(section: Option<&Properties>, key: &str) -> Option<String> {
    section
        .and_then(|s| s.get(key))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn non_empty(props: &Properties, key: &str) -> Option<String> {
    props
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn missing(section: &str, fields: &[&str]) -> ConfigError {
    ConfigError::MissingFields {
        section: section.to_string(),
        fields: fields.iter().map(|f| f.to_string()).collect(),
    }
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_f64(section: &str, key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a number".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ProjectConfig, ConfigError> {
        let ini = Ini::load_from_str(text).unwrap();
        parse_ini(&ini)
    }

    const MINIMAL: &str = "[project]\n\
                           name = Campus\n\
                           base_path = /projects/campus\n\
                           template = /templates/base.mapdoc\n";

    #[test]
    fn test_minimal_project() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.name, "Campus");
        assert_eq!(config.author, DEFAULT_AUTHOR);
        assert!(config.description.is_none());
        assert!(config.locator.is_none());
        assert_eq!(config.legend, LegendConfig::default());
    }

    #[test]
    fn test_missing_project_fields_all_reported() {
        let err = parse("[project]\nauthor = Someone\n").unwrap_err();
        match err {
            ConfigError::MissingFields { section, fields } => {
                assert_eq!(section, "project");
                assert_eq!(fields, vec!["name", "base_path", "template"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_project_section() {
        let err = parse("[legend]\nx = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingFields { .. }));
    }

    #[test]
    fn test_table_defaults_and_path_resolution() {
        let text = format!("{}[table addr]\nextension = .txt\ngeocode = true\n", MINIMAL);
        let config = parse(&text).unwrap();
        assert_eq!(config.tables.len(), 1);

        let table = &config.tables[0];
        assert_eq!(table.name, "addr");
        assert_eq!(table.path, PathBuf::from("/projects/campus/Data/addr.txt"));
        assert!(table.geocode);
        assert!(!table.join);
        assert!(table.visible);
        assert_eq!(table.geocoded_layer_name, "addr_Geocoded");
    }

    #[test]
    fn test_table_explicit_directory() {
        let text = format!("{}[table addr]\npath = /elsewhere\nextension = .txt\n", MINIMAL);
        let config = parse(&text).unwrap();
        assert_eq!(config.tables[0].path, PathBuf::from("/elsewhere/addr.txt"));
    }

    #[test]
    fn test_table_invalid_bool() {
        let text = format!("{}[table addr]\ngeocode = maybe\n", MINIMAL);
        let err = parse(&text).unwrap_err();
        match err {
            ConfigError::InvalidValue { section, key, .. } => {
                assert_eq!(section, "table addr");
                assert_eq!(key, "geocode");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_layer_requires_path() {
        let text = format!("{}[layer roads]\nstyle = roads.style\n", MINIMAL);
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFields { .. }));
    }

    #[test]
    fn test_layer_fields() {
        let text = format!(
            "{}[layer roads]\n\
             path = /data/roads\n\
             style = roads.style\n\
             visible = false\n\
             definition_query = TYPE = 'major'\n",
            MINIMAL
        );
        let config = parse(&text).unwrap();
        let layer = &config.layers[0];
        assert_eq!(layer.name, "roads");
        assert_eq!(layer.style.as_deref(), Some("roads.style"));
        assert!(!layer.visible);
        assert_eq!(layer.definition_query.as_deref(), Some("TYPE = 'major'"));
    }

    #[test]
    fn test_join_missing_fields_all_reported() {
        let text = format!("{}[join 1]\nlayer_name = counties\n", MINIMAL);
        let err = parse(&text).unwrap_err();
        match err {
            ConfigError::MissingFields { section, fields } => {
                assert_eq!(section, "join 1");
                assert_eq!(fields, vec!["layer_path", "table_name"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_sort_rule() {
        let text = format!(
            "{}[sort 1]\nmove = Roads\nref = Parcels\nposition = After\n",
            MINIMAL
        );
        let config = parse(&text).unwrap();
        let rule = &config.sort_rules[0];
        assert_eq!(rule.move_layer_name, "Roads");
        assert_eq!(rule.ref_layer_name, "Parcels");
        assert_eq!(rule.insert_position, InsertPosition::After);
    }

    #[test]
    fn test_sort_invalid_position() {
        let text = format!(
            "{}[sort 1]\nmove = A\nref = B\nposition = under\n",
            MINIMAL
        );
        assert!(matches!(
            parse(&text).unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_output_sections_preserve_order() {
        let text = format!(
            "{}[output B]\nxmin = 0\nymin = 0\nxmax = 1\nymax = 1\n\
             [output A]\nxmin = 2\nymin = 2\nxmax = 3\nymax = 3\n",
            MINIMAL
        );
        let config = parse(&text).unwrap();
        let names: Vec<_> = config.outputs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(config.outputs[1].extent.xmin, 2.0);
    }

    #[test]
    fn test_output_invalid_extent() {
        let text = format!(
            "{}[output A]\nxmin = west\nymin = 0\nxmax = 1\nymax = 1\n",
            MINIMAL
        );
        assert!(matches!(
            parse(&text).unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_legend_overrides() {
        let text = format!("{}[legend]\nx = 1.5\ny = 0.25\nstyle = Stacked\n", MINIMAL);
        let config = parse(&text).unwrap();
        assert_eq!(config.legend.x, 1.5);
        assert_eq!(config.legend.y, 0.25);
        assert_eq!(config.legend.style, "Stacked");
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let text = format!("{}[future]\nkey = value\n", MINIMAL);
        assert!(parse(&text).is_ok());
    }
}
