use crate::heuristics::{coalesce_text, looks_like_recipe};
use crate::model::{RecipeSource, RedditPost};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn image_ext_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(png|jpe?g|webp)$").expect("invalid image ext regex"))
}

fn str_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn unescape(url: &str) -> String {
    // raw_json=1 leaves preview URLs with &amp; escapes
    html_escape::decode_html_entities(url).into_owned()
}

/// Extract the post record from the two-listing payload. The payload is an
/// untyped tree; every access is optional and a missing path yields `None`
/// (the caller maps that to a parse failure).
pub fn parse_post(payload: &Value) -> Option<RedditPost> {
    let listing = if payload.is_array() {
        payload.get(0)?
    } else {
        payload
    };
    let data = listing
        .get("data")?
        .get("children")?
        .get(0)?
        .get("data")?;

    let mut images = Vec::new();

    // preview images
    if let Some(previews) = data
        .get("preview")
        .and_then(|p| p.get("images"))
        .and_then(Value::as_array)
    {
        for p in previews {
            if let Some(src) = p
                .get("source")
                .and_then(|s| s.get("url"))
                .and_then(Value::as_str)
            {
                if !src.is_empty() {
                    images.push(unescape(src));
                }
            }
        }
    }

    // gallery posts carry per-item media metadata instead of a preview
    if data.get("is_gallery").and_then(Value::as_bool) == Some(true) {
        if let Some(metadata) = data.get("media_metadata").and_then(Value::as_object) {
            for m in metadata.values() {
                let best = m
                    .get("p")
                    .and_then(Value::as_array)
                    .and_then(|p| p.last())
                    .and_then(|last| last.get("u"))
                    .and_then(Value::as_str)
                    .or_else(|| m.get("s").and_then(|s| s.get("u")).and_then(Value::as_str))
                    .or_else(|| m.get("s").and_then(|s| s.get("gif")).and_then(Value::as_str));
                if let Some(best) = best {
                    if !best.is_empty() {
                        images.push(unescape(best));
                    }
                }
            }
        }
    }

    Some(RedditPost {
        title: str_field(data, "title"),
        selftext: str_field(data, "selftext"),
        author: str_field(data, "author"),
        url_overridden_by_dest: str_field(data, "url_overridden_by_dest"),
        images: dedupe(images),
    })
}

fn dedupe(urls: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(urls.len());
    for url in urls {
        if !seen.contains(&url) {
            seen.push(url);
        }
    }
    seen
}

/// Single representative image for the post: a direct image link wins over
/// the first preview/gallery image; plain-http results are upgraded to
/// https.
pub fn pick_first_image(images: &[String], overridden: &str) -> Option<String> {
    let direct = if !overridden.is_empty() && image_ext_re().is_match(overridden) {
        Some(overridden.to_string())
    } else {
        None
    };

    let picked = direct.or_else(|| images.first().cloned())?;
    if picked.is_empty() {
        return None;
    }

    Some(if let Some(rest) = picked.strip_prefix("http:") {
        format!("https:{}", rest)
    } else {
        picked
    })
}

/// Search the comment listing for the first top-level comment authored by
/// the original poster, returning its body.
pub fn find_op_top_level_comment(payload: &Value, op: &str) -> Option<String> {
    let children = payload
        .get(1)?
        .get("data")?
        .get("children")?
        .as_array()?;

    for child in children {
        if child.get("kind").and_then(Value::as_str) != Some("t1") {
            continue;
        }
        let data = match child.get("data") {
            Some(d) => d,
            None => continue,
        };
        if data.get("author").and_then(Value::as_str) == Some(op) {
            return Some(str_field(data, "body"));
        }
    }
    None
}

/// Choose the text fed to extraction: the post body if it classifies as a
/// recipe, otherwise the OP's top-level comment when one exists.
pub fn select_recipe_text(payload: &Value, post: &RedditPost) -> (String, RecipeSource) {
    let mut text = coalesce_text(&post.title, &post.selftext);
    let mut from = RecipeSource::Post;

    if !looks_like_recipe(&text) {
        if let Some(body) = find_op_top_level_comment(payload, &post.author) {
            text = coalesce_text(&post.title, &body);
            from = RecipeSource::OpComment;
        }
    }

    (text, from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_payload(data: Value) -> Value {
        json!([
            { "kind": "Listing", "data": { "children": [ { "kind": "t3", "data": data } ] } },
            { "kind": "Listing", "data": { "children": [] } }
        ])
    }

    #[test]
    fn test_parse_post_basic_fields() {
        let payload = post_payload(json!({
            "title": "Negroni riff",
            "selftext": "- 1 oz gin\n- 1 oz Campari",
            "author": "drinkmaker",
            "url_overridden_by_dest": "https://i.redd.it/abc.jpg"
        }));

        let post = parse_post(&payload).unwrap();
        assert_eq!(post.title, "Negroni riff");
        assert_eq!(post.author, "drinkmaker");
        assert_eq!(post.url_overridden_by_dest, "https://i.redd.it/abc.jpg");
        assert!(post.images.is_empty());
    }

    #[test]
    fn test_parse_post_missing_fields_default_to_empty() {
        let post = parse_post(&post_payload(json!({}))).unwrap();
        assert_eq!(post.title, "");
        assert_eq!(post.selftext, "");
        assert_eq!(post.author, "");
    }

    #[test]
    fn test_parse_post_rejects_malformed_payloads() {
        assert!(parse_post(&json!([{ "data": {} }, {}])).is_none());
        assert!(parse_post(&json!([{ "data": { "children": [] } }, {}])).is_none());
        assert!(parse_post(&json!({ "error": 404 })).is_none());
        assert!(parse_post(&json!([])).is_none());
    }

    #[test]
    fn test_preview_images_unescaped() {
        let payload = post_payload(json!({
            "title": "t",
            "preview": { "images": [
                { "source": { "url": "https://preview.redd.it/a.jpg?width=640&amp;s=xyz" } }
            ] }
        }));

        let post = parse_post(&payload).unwrap();
        assert_eq!(
            post.images,
            vec!["https://preview.redd.it/a.jpg?width=640&s=xyz".to_string()]
        );
    }

    #[test]
    fn test_gallery_images_prefer_largest_progressive() {
        let payload = post_payload(json!({
            "title": "gallery",
            "is_gallery": true,
            "media_metadata": {
                "aaa": { "p": [
                    { "u": "https://preview.redd.it/aaa-small.jpg" },
                    { "u": "https://preview.redd.it/aaa-large.jpg?a=1&amp;b=2" }
                ] },
                "bbb": { "s": { "u": "https://preview.redd.it/bbb.jpg" } },
                "ccc": { "s": { "gif": "https://preview.redd.it/ccc.gif" } }
            }
        }));

        let post = parse_post(&payload).unwrap();
        assert_eq!(
            post.images,
            vec![
                "https://preview.redd.it/aaa-large.jpg?a=1&b=2".to_string(),
                "https://preview.redd.it/bbb.jpg".to_string(),
                "https://preview.redd.it/ccc.gif".to_string(),
            ]
        );
    }

    #[test]
    fn test_images_deduped_in_first_seen_order() {
        let payload = post_payload(json!({
            "title": "t",
            "preview": { "images": [
                { "source": { "url": "https://a.jpg" } },
                { "source": { "url": "https://b.jpg" } }
            ] },
            "is_gallery": true,
            "media_metadata": {
                "x": { "s": { "u": "https://a.jpg" } }
            }
        }));

        let post = parse_post(&payload).unwrap();
        assert_eq!(post.images, vec!["https://a.jpg", "https://b.jpg"]);
    }

    #[test]
    fn test_pick_first_image_prefers_direct_image_link() {
        let images = vec!["https://preview.redd.it/first.jpg".to_string()];
        assert_eq!(
            pick_first_image(&images, "https://i.redd.it/direct.PNG"),
            Some("https://i.redd.it/direct.PNG".to_string())
        );
        // Non-image override loses to the first collected image
        assert_eq!(
            pick_first_image(&images, "https://imgur.com/gallery/xyz"),
            Some("https://preview.redd.it/first.jpg".to_string())
        );
    }

    #[test]
    fn test_pick_first_image_forces_https() {
        let images = vec!["http://preview.redd.it/a.jpg".to_string()];
        assert_eq!(
            pick_first_image(&images, ""),
            Some("https://preview.redd.it/a.jpg".to_string())
        );
    }

    #[test]
    fn test_pick_first_image_none_when_nothing_qualifies() {
        assert_eq!(pick_first_image(&[], ""), None);
        assert_eq!(pick_first_image(&[], "https://imgur.com/gallery/xyz"), None);
    }

    fn payload_with_comments(post: Value, comments: Value) -> Value {
        json!([
            { "kind": "Listing", "data": { "children": [ { "kind": "t3", "data": post } ] } },
            { "kind": "Listing", "data": { "children": comments } }
        ])
    }

    #[test]
    fn test_find_op_comment_skips_other_authors_and_non_comments() {
        let payload = payload_with_comments(
            json!({ "title": "t", "author": "op" }),
            json!([
                { "kind": "more", "data": { "author": "op", "body": "not a comment" } },
                { "kind": "t1", "data": { "author": "someone_else", "body": "nice" } },
                { "kind": "t1", "data": { "author": "op", "body": "- 2 oz gin\n- 1 oz lime" } }
            ]),
        );

        assert_eq!(
            find_op_top_level_comment(&payload, "op"),
            Some("- 2 oz gin\n- 1 oz lime".to_string())
        );
        assert_eq!(find_op_top_level_comment(&payload, "nobody"), None);
    }

    #[test]
    fn test_selector_falls_back_to_op_comment() {
        let payload = payload_with_comments(
            json!({
                "title": "Last Word",
                "selftext": "Made this last night, recipe in comments!",
                "author": "op"
            }),
            json!([
                { "kind": "t1", "data": { "author": "op", "body": "- 3/4 oz gin\n- 3/4 oz green Chartreuse" } }
            ]),
        );
        let post = parse_post(&payload).unwrap();

        let (text, from) = select_recipe_text(&payload, &post);
        assert_eq!(from, RecipeSource::OpComment);
        assert!(text.starts_with("Last Word\n\n"));
        assert!(text.contains("green Chartreuse"));
    }

    #[test]
    fn test_selector_keeps_post_body_when_it_classifies() {
        let payload = payload_with_comments(
            json!({
                "title": "Daiquiri",
                "selftext": "2 oz rum\n3/4 oz lime juice",
                "author": "op"
            }),
            json!([
                { "kind": "t1", "data": { "author": "op", "body": "- 1 oz something else\n- 1 oz other" } }
            ]),
        );
        let post = parse_post(&payload).unwrap();

        let (text, from) = select_recipe_text(&payload, &post);
        assert_eq!(from, RecipeSource::Post);
        assert!(text.contains("2 oz rum"));
    }

    #[test]
    fn test_selector_keeps_post_source_when_no_op_comment() {
        let payload = payload_with_comments(
            json!({ "title": "Mystery drink", "selftext": "so good", "author": "op" }),
            json!([ { "kind": "t1", "data": { "author": "other", "body": "- 2 oz x\n- 1 oz y" } } ]),
        );
        let post = parse_post(&payload).unwrap();

        let (text, from) = select_recipe_text(&payload, &post);
        assert_eq!(from, RecipeSource::Post);
        assert_eq!(text, "Mystery drink\n\nso good");
    }
}
