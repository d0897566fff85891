//! Records decoded from API responses
//!
//! These are plain data: `serde` maps the JSON fields onto them and nothing
//! else happens here. Nullable string fields decode as empty strings.

use crate::date::TwitterDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A user profile as returned by `users/show`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub screen_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lang: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_zone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub friends_count: i64,
    #[serde(default)]
    pub listed_count: i64,
    #[serde(default)]
    pub favourites_count: i64,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub statuses_count: i64,
    pub created_at: TwitterDate,
}

/// A timeline entry as returned by `statuses/user_timeline`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    pub retweeted: bool,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default, rename = "possibly_sensitive")]
    pub sensitive: bool,
    pub created_at: TwitterDate,
}

/// One page of a cursored id list (`followers/ids`, `friends/ids`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdPage {
    pub ids: Vec<i64>,
    pub next_cursor: i64,
    #[serde(default)]
    pub previous_cursor: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod model_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_profile_decode() {
        let profile: Profile = serde_json::from_value(json!({
            "id": 2_244_994_945_i64,
            "name": "Twitter Dev",
            "screen_name": "TwitterDev",
            "description": "Your official source",
            "location": "127.0.0.1",
            "url": null,
            "time_zone": null,
            "protected": false,
            "verified": true,
            "followers_count": 512_000,
            "friends_count": 1800,
            "statuses_count": 3600,
            "created_at": "Sat Dec 14 04:35:55 +0000 2013",
            "unknown_field": {"ignored": true}
        }))
        .unwrap();

        assert_eq!(profile.id, 2_244_994_945);
        assert_eq!(profile.screen_name, "TwitterDev");
        assert_eq!(profile.url, "");
        assert_eq!(profile.time_zone, "");
        assert!(profile.verified);
        assert_eq!(profile.followers_count, 512_000);
        assert_eq!(profile.created_at.to_utc().timestamp(), 1_386_995_755);
    }

    #[test]
    fn test_post_decode() {
        let posts: Vec<Post> = serde_json::from_value(json!([
            {
                "id": 1_050_118_621_198_921_728_i64,
                "text": "To make room for more expression",
                "retweeted": false,
                "retweet_count": 161,
                "possibly_sensitive": true,
                "created_at": "Wed Oct 10 20:19:24 +0000 2018"
            },
            {
                "id": 1,
                "text": "no sensitivity flag",
                "created_at": "Wed Oct 10 20:19:24 +0000 2018"
            }
        ]))
        .unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].retweet_count, 161);
        assert!(posts[0].sensitive);
        assert!(!posts[1].sensitive);
    }

    #[test]
    fn test_id_page_decode() {
        let page: IdPage = serde_json::from_value(json!({
            "ids": [1, 2, 3],
            "next_cursor": 1_374_004_777_531_007_833_i64,
            "next_cursor_str": "1374004777531007833",
            "previous_cursor": 0
        }))
        .unwrap();

        assert_eq!(page.ids, vec![1, 2, 3]);
        assert_eq!(page.next_cursor, 1_374_004_777_531_007_833);
        assert_eq!(page.previous_cursor, 0);
    }

    #[test]
    fn test_id_page_requires_cursor() {
        let result = serde_json::from_value::<IdPage>(json!({ "ids": [1] }));
        assert!(result.is_err());
    }
}
