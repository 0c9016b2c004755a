//! Level interchange codes
//!
//! A level code is the level's JSON text encoded as standard padded
//! Base64, so it survives clipboards and chat. Decoding checks the
//! mandatory objects before accepting anything.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::{Level, LevelError};

/// Top-level fields every level code must carry as JSON objects
const REQUIRED_OBJECTS: [&str; 2] = ["playerStart", "goal"];

/// Encode a level as a shareable text code
pub fn encode(level: &Level) -> Result<String, LevelError> {
    let json = serde_json::to_string(level)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// Decode a level code, rejecting payloads without a start or goal
pub fn decode(code: &str) -> Result<Level, LevelError> {
    let bytes = STANDARD.decode(code.trim())?;
    let json = String::from_utf8(bytes)?;
    from_json(&json)
}

/// Parse level JSON with the same validation as `decode`
pub fn from_json(json: &str) -> Result<Level, LevelError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    for field in REQUIRED_OBJECTS {
        if !value.get(field).is_some_and(|v| v.is_object()) {
            return Err(LevelError::MissingField(field));
        }
    }
    let level: Level = serde_json::from_value(value)?;
    if let Some(portal) = level.portals.iter().find(|p| p.portal_id > Level::MAX_PORTAL_ID) {
        return Err(LevelError::PortalIdOutOfRange(portal.portal_id));
    }
    Ok(level.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::builtin;

    fn encode_json(json: &str) -> String {
        STANDARD.encode(json.as_bytes())
    }

    #[test]
    fn test_builtin_levels_round_trip() {
        for id in builtin::ids() {
            let level = builtin::level(id).unwrap();
            let code = encode(&level).unwrap();
            assert_eq!(decode(&code).unwrap(), level);
        }
    }

    #[test]
    fn test_code_is_base64_of_json() {
        let level = builtin::level(1).unwrap();
        let code = encode(&level).unwrap();
        let json = String::from_utf8(STANDARD.decode(&code).unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["playerStart"].is_object());
        assert_eq!(value["name"], "First Steps");
    }

    #[test]
    fn test_missing_goal_rejected() {
        let code = encode_json(r#"{ "name": "x", "playerStart": { "x": 1, "y": 2 } }"#);
        assert!(matches!(decode(&code), Err(LevelError::MissingField("goal"))));
    }

    #[test]
    fn test_non_object_start_rejected() {
        let code = encode_json(r#"{ "playerStart": [1, 2], "goal": { "x": 1, "y": 2 } }"#);
        assert!(matches!(
            decode(&code),
            Err(LevelError::MissingField("playerStart"))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(decode("not base64 !!"), Err(LevelError::Base64(_))));
        let code = encode_json("{ nope");
        assert!(matches!(decode(&code), Err(LevelError::Json(_))));
        let code = STANDARD.encode([0xffu8, 0xfe]);
        assert!(matches!(decode(&code), Err(LevelError::Utf8(_))));
    }

    #[test]
    fn test_max_portal_id_rejected() {
        let code = encode_json(
            r#"{
                "portals": [{
                    "x": 1, "y": 2,
                    "destination": { "x": 3, "y": 4 },
                    "portalId": 4294967295
                }],
                "playerStart": { "x": 1, "y": 2 },
                "goal": { "x": 3, "y": 4 }
            }"#,
        );
        assert!(matches!(
            decode(&code),
            Err(LevelError::PortalIdOutOfRange(u32::MAX))
        ));
    }

    #[test]
    fn test_minimal_code_gets_defaults() {
        let code = encode_json(
            r#"{ "playerStart": { "x": 1, "y": 2 }, "goal": { "x": 3, "y": 4 } }"#,
        );
        let level = decode(&code).unwrap();
        assert!(level.platforms.is_empty());
        assert_eq!(level.goal.width, 50.0);
    }

    mod proptests {
        use super::*;
        use crate::level::{Platform, Point, Portal, Spike, Trampoline};
        use crate::sim::color::ShadeColor;
        use proptest::prelude::*;

        fn color() -> impl Strategy<Value = ShadeColor> {
            prop_oneof![Just(ShadeColor::Black), Just(ShadeColor::White)]
        }

        fn coord() -> impl Strategy<Value = f32> {
            (-1000i32..2000).prop_map(|v| v as f32 * 0.5)
        }

        prop_compose! {
            fn arb_level()(
                name in "[a-zA-Z0-9 ]{0,16}",
                platforms in prop::collection::vec((coord(), coord(), color()), 0..6),
                spikes in prop::collection::vec((coord(), coord(), color()), 0..4),
                trampolines in prop::collection::vec((coord(), coord(), color()), 0..3),
                portals in prop::collection::vec(
                    (coord(), coord(), coord(), coord(), 0u32..20),
                    0..3,
                ),
                start in (coord(), coord()),
                goal in (coord(), coord()),
            ) -> Level {
                let mut level = Level::new(name);
                level.platforms = platforms
                    .into_iter()
                    .map(|(x, y, c)| Platform::new(x, y, c))
                    .collect();
                level.obstacles = spikes
                    .into_iter()
                    .map(|(x, y, c)| Spike::new(x, y, c))
                    .collect();
                level.trampolines = trampolines
                    .into_iter()
                    .map(|(x, y, c)| Trampoline::new(x, y, c))
                    .collect();
                level.portals = portals
                    .into_iter()
                    .map(|(x, y, dx, dy, id)| {
                        Portal::new(x, y, ShadeColor::Black, Point::new(dx, dy), id)
                    })
                    .collect();
                level.player_start = Point::new(start.0, start.1);
                level.goal = crate::level::Goal::new(goal.0, goal.1);
                level
            }
        }

        proptest! {
            #[test]
            fn decode_inverts_encode(level in arb_level()) {
                let code = encode(&level).unwrap();
                prop_assert_eq!(decode(&code).unwrap(), level);
            }
        }
    }
}
