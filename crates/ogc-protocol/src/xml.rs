//! XML document formatters.
//!
//! Capability and feature documents are built event-by-event with
//! `quick_xml::Writer` using 2-space indentation; the indentation is
//! cosmetic, the element tree is the contract. The exception report is a
//! small fixed template and is rendered infallibly.

use crate::{FeatureCapabilities, MapCapabilities};
use ogc_common::{BoundingBox, Feature, FeatureCollection, Geometry, ProtocolException};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

type XmlResult<T> = Result<T, quick_xml::Error>;

const WMS_XMLNS: &str = "http://www.opengis.net/wms";
const WFS_XMLNS: &str = "http://www.opengis.net/wfs/2.0";
const OWS_XMLNS: &str = "http://www.opengis.net/ows/1.1";
const OGC_XMLNS: &str = "http://www.opengis.net/ogc";
const XSI_XMLNS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XLINK_XMLNS: &str = "http://www.w3.org/1999/xlink";

const SERVICE_BASE_URL: &str = "http://example.com/ogc";

/// Serialize a `WMS_Capabilities` document.
pub fn map_capabilities_xml(caps: &MapCapabilities) -> XmlResult<String> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("WMS_Capabilities");
    root.push_attribute(("version", caps.version.as_str()));
    root.push_attribute(("xmlns", WMS_XMLNS));
    root.push_attribute(("xmlns:xsi", XSI_XMLNS));
    root.push_attribute((
        "xsi:schemaLocation",
        format!(
            "{WMS_XMLNS} http://schemas.opengis.net/wms/{}/capabilities_1_3_0.xsd",
            caps.version
        )
        .as_str(),
    ));
    w.write_event(Event::Start(root))?;

    // Service section
    w.write_event(Event::Start(BytesStart::new("Service")))?;
    text_element(&mut w, "Name", "WMS")?;
    text_element(&mut w, "Title", &caps.service_metadata.title)?;
    text_element(&mut w, "Abstract", &caps.service_metadata.abstract_)?;

    w.write_event(Event::Start(BytesStart::new("ContactInformation")))?;
    w.write_event(Event::Start(BytesStart::new("ContactPersonPrimary")))?;
    text_element(&mut w, "ContactPerson", &caps.service_metadata.contact_person)?;
    text_element(
        &mut w,
        "ContactOrganization",
        &caps.service_metadata.organization,
    )?;
    w.write_event(Event::End(BytesEnd::new("ContactPersonPrimary")))?;
    text_element(
        &mut w,
        "ContactElectronicMailAddress",
        &caps.service_metadata.contact_email,
    )?;
    w.write_event(Event::End(BytesEnd::new("ContactInformation")))?;
    w.write_event(Event::End(BytesEnd::new("Service")))?;

    // Capability section
    w.write_event(Event::Start(BytesStart::new("Capability")))?;
    w.write_event(Event::Start(BytesStart::new("Request")))?;

    w.write_event(Event::Start(BytesStart::new("GetCapabilities")))?;
    text_element(&mut w, "Format", "text/xml")?;
    dcp_type(&mut w, &format!("{SERVICE_BASE_URL}/wms"))?;
    w.write_event(Event::End(BytesEnd::new("GetCapabilities")))?;

    w.write_event(Event::Start(BytesStart::new("GetMap")))?;
    for format in &caps.formats {
        text_element(&mut w, "Format", format)?;
    }
    dcp_type(&mut w, &format!("{SERVICE_BASE_URL}/wms/map"))?;
    w.write_event(Event::End(BytesEnd::new("GetMap")))?;

    w.write_event(Event::End(BytesEnd::new("Request")))?;

    // Root layer wrapping the advertised layers
    w.write_event(Event::Start(BytesStart::new("Layer")))?;
    text_element(&mut w, "Title", "Available Layers")?;
    for crs in &caps.crs {
        text_element(&mut w, "CRS", crs.as_str())?;
    }

    for layer in &caps.layers {
        let mut child = BytesStart::new("Layer");
        child.push_attribute(("queryable", if layer.queryable { "1" } else { "0" }));
        w.write_event(Event::Start(child))?;

        text_element(&mut w, "Name", &layer.name)?;
        text_element(&mut w, "Title", &layer.title)?;
        text_element(&mut w, "Abstract", &layer.abstract_)?;
        for crs in &layer.crs {
            text_element(&mut w, "CRS", crs.as_str())?;
        }
        geographic_bbox(&mut w, &layer.bbox)?;
        for style in &layer.styles {
            w.write_event(Event::Start(BytesStart::new("Style")))?;
            text_element(&mut w, "Name", style)?;
            text_element(&mut w, "Title", &capitalize(style))?;
            w.write_event(Event::End(BytesEnd::new("Style")))?;
        }

        w.write_event(Event::End(BytesEnd::new("Layer")))?;
    }

    w.write_event(Event::End(BytesEnd::new("Layer")))?;
    w.write_event(Event::End(BytesEnd::new("Capability")))?;
    w.write_event(Event::End(BytesEnd::new("WMS_Capabilities")))?;

    Ok(String::from_utf8_lossy(&w.into_inner()).into_owned())
}

/// Serialize a `WFS_Capabilities` document.
pub fn feature_capabilities_xml(caps: &FeatureCapabilities) -> XmlResult<String> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("WFS_Capabilities");
    root.push_attribute(("version", caps.version.as_str()));
    root.push_attribute(("xmlns", WFS_XMLNS));
    root.push_attribute(("xmlns:xsi", XSI_XMLNS));
    root.push_attribute((
        "xsi:schemaLocation",
        format!("{WFS_XMLNS} http://schemas.opengis.net/wfs/2.0/wfs.xsd").as_str(),
    ));
    w.write_event(Event::Start(root))?;

    w.write_event(Event::Start(BytesStart::new("ServiceIdentification")))?;
    text_element(&mut w, "Title", &caps.service_metadata.title)?;
    text_element(&mut w, "Abstract", &caps.service_metadata.abstract_)?;
    if !caps.service_metadata.keywords.is_empty() {
        w.write_event(Event::Start(BytesStart::new("Keywords")))?;
        for keyword in &caps.service_metadata.keywords {
            text_element(&mut w, "Keyword", keyword)?;
        }
        w.write_event(Event::End(BytesEnd::new("Keywords")))?;
    }
    text_element(&mut w, "ServiceType", "WFS")?;
    text_element(&mut w, "ServiceTypeVersion", &caps.version)?;
    w.write_event(Event::End(BytesEnd::new("ServiceIdentification")))?;

    w.write_event(Event::Start(BytesStart::new("ServiceProvider")))?;
    text_element(&mut w, "ProviderName", &caps.service_metadata.organization)?;
    w.write_event(Event::Start(BytesStart::new("ServiceContact")))?;
    text_element(&mut w, "IndividualName", &caps.service_metadata.contact_person)?;
    text_element(&mut w, "PositionName", "Administrator")?;
    w.write_event(Event::Start(BytesStart::new("ContactInfo")))?;
    w.write_event(Event::Start(BytesStart::new("Address")))?;
    text_element(
        &mut w,
        "ElectronicMailAddress",
        &caps.service_metadata.contact_email,
    )?;
    w.write_event(Event::End(BytesEnd::new("Address")))?;
    w.write_event(Event::End(BytesEnd::new("ContactInfo")))?;
    w.write_event(Event::End(BytesEnd::new("ServiceContact")))?;
    w.write_event(Event::End(BytesEnd::new("ServiceProvider")))?;

    w.write_event(Event::Start(BytesStart::new("OperationsMetadata")))?;
    operation(&mut w, "GetCapabilities", &format!("{SERVICE_BASE_URL}/wfs"))?;
    operation(
        &mut w,
        "GetFeature",
        &format!("{SERVICE_BASE_URL}/wfs/feature"),
    )?;
    let mut param = BytesStart::new("Parameter");
    param.push_attribute(("name", "outputFormat"));
    w.write_event(Event::Start(param))?;
    for format in &caps.formats {
        w.write_event(Event::Start(BytesStart::new("AllowedValues")))?;
        text_element(&mut w, "Value", format)?;
        w.write_event(Event::End(BytesEnd::new("AllowedValues")))?;
    }
    w.write_event(Event::End(BytesEnd::new("Parameter")))?;
    w.write_event(Event::End(BytesEnd::new("OperationsMetadata")))?;

    w.write_event(Event::Start(BytesStart::new("FeatureTypeList")))?;
    for ft in &caps.feature_types {
        w.write_event(Event::Start(BytesStart::new("FeatureType")))?;
        text_element(&mut w, "Name", &ft.name)?;
        text_element(&mut w, "Title", &ft.title)?;
        text_element(&mut w, "Abstract", &ft.abstract_)?;
        if !ft.keywords.is_empty() {
            w.write_event(Event::Start(BytesStart::new("Keywords")))?;
            for keyword in &ft.keywords {
                text_element(&mut w, "Keyword", keyword)?;
            }
            w.write_event(Event::End(BytesEnd::new("Keywords")))?;
        }
        if let Some(default) = ft.default_crs() {
            text_element(&mut w, "DefaultCRS", default.as_str())?;
        }
        for crs in ft.other_crs() {
            text_element(&mut w, "OtherCRS", crs.as_str())?;
        }

        let mut bbox_el = BytesStart::new("WGS84BoundingBox");
        bbox_el.push_attribute(("xmlns", OWS_XMLNS));
        w.write_event(Event::Start(bbox_el))?;
        text_element(
            &mut w,
            "LowerCorner",
            &format!("{} {}", ft.bbox.min_x, ft.bbox.min_y),
        )?;
        text_element(
            &mut w,
            "UpperCorner",
            &format!("{} {}", ft.bbox.max_x, ft.bbox.max_y),
        )?;
        w.write_event(Event::End(BytesEnd::new("WGS84BoundingBox")))?;

        w.write_event(Event::End(BytesEnd::new("FeatureType")))?;
    }
    w.write_event(Event::End(BytesEnd::new("FeatureTypeList")))?;

    w.write_event(Event::End(BytesEnd::new("WFS_Capabilities")))?;

    Ok(String::from_utf8_lossy(&w.into_inner()).into_owned())
}

/// Serialize a feature collection as a `wfs:FeatureCollection` document.
pub fn feature_collection_xml(collection: &FeatureCollection) -> XmlResult<String> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("wfs:FeatureCollection");
    root.push_attribute(("xmlns:wfs", WFS_XMLNS));
    root.push_attribute(("numberReturned", collection.len().to_string().as_str()));
    w.write_event(Event::Start(root))?;

    for feature in &collection.features {
        w.write_event(Event::Start(BytesStart::new("wfs:member")))?;
        write_feature(&mut w, feature)?;
        w.write_event(Event::End(BytesEnd::new("wfs:member")))?;
    }

    w.write_event(Event::End(BytesEnd::new("wfs:FeatureCollection")))?;

    Ok(String::from_utf8_lossy(&w.into_inner()).into_owned())
}

/// Render a `ServiceExceptionReport` document.
///
/// This is the one formatter that must never fail; every error path ends
/// here, so it is a fixed template with escaped interpolations.
pub fn exception_report_xml(ex: &ProtocolException) -> String {
    let locator_attr = match &ex.locator {
        Some(locator) => format!(" locator=\"{}\"", escape(locator.as_str())),
        None => String::new(),
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ServiceExceptionReport version="1.3.0" xmlns="{OGC_XMLNS}">
  <ServiceException code="{}"{}>{}</ServiceException>
</ServiceExceptionReport>"#,
        ex.code.as_str(),
        locator_attr,
        escape(ex.message.as_str()),
    )
}

fn write_feature(w: &mut Writer<Vec<u8>>, feature: &Feature) -> XmlResult<()> {
    let mut el = BytesStart::new("Feature");
    if let Some(id) = &feature.id {
        el.push_attribute(("id", id.as_str()));
    }
    w.write_event(Event::Start(el))?;

    write_geometry(w, &feature.geometry)?;

    for (key, value) in &feature.properties {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        text_element(w, key, &text)?;
    }

    w.write_event(Event::End(BytesEnd::new("Feature")))?;
    Ok(())
}

fn write_geometry(w: &mut Writer<Vec<u8>>, geometry: &Geometry) -> XmlResult<()> {
    let tag = geometry.type_name();
    w.write_event(Event::Start(BytesStart::new(tag)))?;

    match geometry {
        Geometry::Point { coordinates } => {
            text_element(w, "coordinates", &format!("{},{}", coordinates[0], coordinates[1]))?;
        }
        Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
            text_element(w, "coordinates", &positions_text(coordinates))?;
        }
        Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
            for ring in coordinates {
                text_element(w, "coordinates", &positions_text(ring))?;
            }
        }
        Geometry::MultiPolygon { coordinates } => {
            for polygon in coordinates {
                for ring in polygon {
                    text_element(w, "coordinates", &positions_text(ring))?;
                }
            }
        }
    }

    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn positions_text(positions: &[[f64; 2]]) -> String {
    positions
        .iter()
        .map(|[x, y]| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_element(w: &mut Writer<Vec<u8>>, name: &str, text: &str) -> XmlResult<()> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn dcp_type(w: &mut Writer<Vec<u8>>, href: &str) -> XmlResult<()> {
    w.write_event(Event::Start(BytesStart::new("DCPType")))?;
    w.write_event(Event::Start(BytesStart::new("HTTP")))?;
    w.write_event(Event::Start(BytesStart::new("Get")))?;
    let mut resource = BytesStart::new("OnlineResource");
    resource.push_attribute(("xmlns:xlink", XLINK_XMLNS));
    resource.push_attribute(("xlink:type", "simple"));
    resource.push_attribute(("xlink:href", href));
    w.write_event(Event::Empty(resource))?;
    w.write_event(Event::End(BytesEnd::new("Get")))?;
    w.write_event(Event::End(BytesEnd::new("HTTP")))?;
    w.write_event(Event::End(BytesEnd::new("DCPType")))?;
    Ok(())
}

fn operation(w: &mut Writer<Vec<u8>>, name: &str, href: &str) -> XmlResult<()> {
    let mut op = BytesStart::new("Operation");
    op.push_attribute(("name", name));
    w.write_event(Event::Start(op))?;
    w.write_event(Event::Start(BytesStart::new("DCP")))?;
    w.write_event(Event::Start(BytesStart::new("HTTP")))?;
    let mut get = BytesStart::new("Get");
    get.push_attribute(("xmlns:xlink", XLINK_XMLNS));
    get.push_attribute(("xlink:href", href));
    w.write_event(Event::Empty(get))?;
    w.write_event(Event::End(BytesEnd::new("HTTP")))?;
    w.write_event(Event::End(BytesEnd::new("DCP")))?;
    w.write_event(Event::End(BytesEnd::new("Operation")))?;
    Ok(())
}

fn geographic_bbox(w: &mut Writer<Vec<u8>>, bbox: &BoundingBox) -> XmlResult<()> {
    w.write_event(Event::Start(BytesStart::new("EX_GeographicBoundingBox")))?;
    text_element(w, "westBoundLongitude", &bbox.min_x.to_string())?;
    text_element(w, "southBoundLatitude", &bbox.min_y.to_string())?;
    text_element(w, "eastBoundLongitude", &bbox.max_x.to_string())?;
    text_element(w, "northBoundLatitude", &bbox.max_y.to_string())?;
    w.write_event(Event::End(BytesEnd::new("EX_GeographicBoundingBox")))?;
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceCatalog;
    use ogc_common::Feature;

    #[test]
    fn test_map_capabilities_root_and_version() {
        let catalog = ServiceCatalog::builtin();
        let xml = map_capabilities_xml(&MapCapabilities::from_catalog(&catalog)).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<WMS_Capabilities version=\"1.3.0\""));
        assert!(xml.contains("<Name>basemap</Name>"));
        assert!(xml.contains("<Layer queryable=\"1\">"));
        assert!(xml.contains("<Layer queryable=\"0\">"));
        assert!(xml.contains("<westBoundLongitude>-180</westBoundLongitude>"));
        assert!(xml.contains("<Format>image/png</Format>"));
        assert!(xml.contains("</WMS_Capabilities>"));
    }

    #[test]
    fn test_feature_capabilities_structure() {
        let catalog = ServiceCatalog::builtin();
        let xml = feature_capabilities_xml(&FeatureCapabilities::from_catalog(&catalog)).unwrap();
        assert!(xml.contains("<WFS_Capabilities version=\"2.0.0\""));
        assert!(xml.contains("<Name>points_of_interest</Name>"));
        assert!(xml.contains("<DefaultCRS>EPSG:4326</DefaultCRS>"));
        assert!(xml.contains("<OtherCRS>EPSG:3857</OtherCRS>"));
        assert!(xml.contains("<LowerCorner>-180 -90</LowerCorner>"));
        assert!(xml.contains("<Value>application/json</Value>"));
        assert!(xml.contains("<Operation name=\"GetFeature\">"));
    }

    #[test]
    fn test_feature_collection_xml() {
        let fc = FeatureCollection::new()
            .with_feature(
                Feature::point(-73.985428, 40.748817)
                    .with_id("1")
                    .with_property("name", "Empire State Building"),
            )
            .with_feature(Feature::point(-74.013961, 40.704543).with_property("id", 2));

        let xml = feature_collection_xml(&fc).unwrap();
        assert!(xml.contains("numberReturned=\"2\""));
        assert!(xml.contains("<Feature id=\"1\">"));
        assert!(xml.contains("<coordinates>-73.985428,40.748817</coordinates>"));
        assert!(xml.contains("<name>Empire State Building</name>"));
        assert!(xml.contains("<id>2</id>"));
    }

    #[test]
    fn test_exception_report() {
        let ex = ProtocolException::invalid_parameter("Invalid service: WFS. Expected WMS", "service");
        let xml = exception_report_xml(&ex);
        assert!(xml.contains("<ServiceExceptionReport version=\"1.3.0\""));
        assert!(xml.contains("code=\"InvalidParameterValue\""));
        assert!(xml.contains("locator=\"service\""));
        assert!(xml.contains("Invalid service: WFS. Expected WMS"));
    }

    #[test]
    fn test_exception_report_escapes_and_omits_locator() {
        let ex = ProtocolException::new(
            ogc_common::ExceptionCode::NoApplicableCode,
            "broken <tag> & \"quote\"",
        );
        let xml = exception_report_xml(&ex);
        assert!(!xml.contains("locator="));
        assert!(xml.contains("broken &lt;tag&gt; &amp;"));
    }
}
