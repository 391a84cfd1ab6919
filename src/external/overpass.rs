use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};

use crate::{
    error::{invalid_input_error, upstream_error, Error},
    external::nominatim::Place,
};

// Highways a pedestrian can use: everything tagged highway except areas,
// private ways, explicit foot=no and the classes below.
const WALK_FILTER: &str = concat!(
    r#"["highway"]["area"!~"yes"]["access"!~"private"]"#,
    r#"["highway"!~"abandoned|bus_guideway|construction|cycleway|motor|no|planned|platform|proposed|raceway|razed"]"#,
    r#"["foot"!~"no"]["service"!~"private"]"#,
);

const RELATION_AREA_OFFSET: i64 = 3_600_000_000;
const WAY_AREA_OFFSET: i64 = 2_400_000_000;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Document {
    pub elements: Vec<Element>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        id: i64,
        nodes: Vec<i64>,
    },
    #[serde(other)]
    Other,
}

/// Overpass area id for a Nominatim place. Only ways and relations bound an
/// area.
pub fn area_id(place: &Place) -> Option<i64> {
    let osm_id = place.osm_id?;

    match place.osm_type.as_deref()? {
        "relation" => Some(RELATION_AREA_OFFSET + osm_id),
        "way" => Some(WAY_AREA_OFFSET + osm_id),
        _ => None,
    }
}

pub fn walk_network_query(area_id: i64) -> String {
    format!(
        "[out:json][timeout:180];(way{}(area:{});>;);out body;",
        WALK_FILTER, area_id
    )
}

#[derive(Clone, Debug)]
pub struct Overpass {
    client: reqwest::Client,
    api_base: String,
    user_agent: String,
}

impl Overpass {
    pub fn new(api_base: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            user_agent: user_agent.into(),
        }
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn interpret(&self, query: &str) -> Result<Document, Error> {
        let url = format!("{}/interpreter", self.api_base.trim_end_matches('/'));

        let res = self
            .client
            .post(url)
            .header(USER_AGENT, &self.user_agent)
            .form(&[("data", query)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        Ok(res.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{body_string_contains, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn place(osm_type: &str, osm_id: i64) -> Place {
        Place {
            osm_type: Some(osm_type.into()),
            osm_id: Some(osm_id),
            display_name: "Toronto, Golden Horseshoe, Ontario, Canada".into(),
            lat: "43.6534817".into(),
            lon: "-79.3839347".into(),
        }
    }

    #[test]
    fn area_ids() {
        assert_eq!(area_id(&place("relation", 324_211)), Some(3_600_324_211));
        assert_eq!(area_id(&place("way", 27_440_932)), Some(2_427_440_932));
        assert_eq!(area_id(&place("node", 1)), None);
    }

    #[test]
    fn query_filters_walkable_ways_in_area() {
        let query = walk_network_query(3_600_324_211);

        assert!(query.starts_with("[out:json]"));
        assert!(query.contains("(area:3600324211)"));
        assert!(query.contains(r#"["foot"!~"no"]"#));
        assert!(query.ends_with("out body;"));
    }

    #[test]
    fn unknown_elements_are_tolerated() {
        let document: Document = serde_json::from_value(json!({
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 43.65, "lon": -79.38, "tags": {"highway": "crossing"}},
                {"type": "way", "id": 10, "nodes": [1, 2]},
                {"type": "relation", "id": 100, "members": []}
            ]
        }))
        .unwrap();

        assert_eq!(
            document.elements,
            vec![
                Element::Node {
                    id: 1,
                    lat: 43.65,
                    lon: -79.38
                },
                Element::Way {
                    id: 10,
                    nodes: vec![1, 2]
                },
                Element::Other,
            ]
        );
    }

    #[tokio::test]
    async fn interpret_posts_the_query() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/interpreter"))
            .and(body_string_contains("data="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "elements": [{"type": "node", "id": 1, "lat": 43.65, "lon": -79.38}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let overpass = Overpass::new(server.uri(), "walkability-app");
        let document = overpass
            .interpret(&walk_network_query(3_600_324_211))
            .await
            .unwrap();

        assert_eq!(document.elements.len(), 1);
    }

    #[tokio::test]
    async fn gateway_timeout_is_an_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(504))
            .mount(&server)
            .await;

        let overpass = Overpass::new(server.uri(), "walkability-app");
        let err = overpass.interpret("[out:json];out;").await.unwrap_err();

        assert_eq!(err.code, 4);
    }
}
