//! Imgflip meme generator

use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{error, info, instrument};

const IMGFLIP_API_URL: &str = "https://api.imgflip.com/caption_image";

/// Templates a meme is drawn from at random
pub const MEME_TEMPLATE_IDS: [&str; 10] = [
    "181913649", // Drake Hotline Bling
    "112126428", // Distracted Boyfriend
    "87743020",  // Two Buttons
    "129242436", // Change My Mind
    "188390779", // Woman Yelling At Cat
    "61579",     // One Does Not Simply
    "247375501", // Buff Doge vs. Cheems
    "438680",    // Success Kid
    "93895088",  // Expanding Brain
    "101470",    // Ancient Aliens
];

/// Split text into (top, bottom) captions.
///
/// Fewer than four words go to the bottom line only; otherwise the words are
/// halved, with the extra word (if any) on the bottom.
pub fn split_caption(text: &str) -> (String, String) {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 4 {
        return (String::new(), text.to_string());
    }
    let mid = words.len() / 2;
    (words[..mid].join(" "), words[mid..].join(" "))
}

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    success: bool,
    data: Option<CaptionData>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionData {
    url: String,
}

/// Client for Imgflip's caption API
#[derive(Clone)]
pub struct ImgflipRenderer {
    client: reqwest::Client,
    username: String,
    password: String,
}

impl ImgflipRenderer {
    pub fn new(client: reqwest::Client, username: &str, password: &str) -> Self {
        Self {
            client,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Caption a random template with `text`
    #[instrument(skip(self, text))]
    pub async fn render(&self, text: &str) -> Option<String> {
        let template = MEME_TEMPLATE_IDS.choose(&mut rand::thread_rng())?;
        self.render_with_template(template, text).await
    }

    /// Caption a specific template
    pub async fn render_with_template(&self, template_id: &str, text: &str) -> Option<String> {
        let (top, bottom) = split_caption(text);
        let form = [
            ("template_id", template_id),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
            ("text0", top.as_str()),
            ("text1", bottom.as_str()),
        ];

        let response = match self.client.post(IMGFLIP_API_URL).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Imgflip request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            error!(status = %response.status(), "Imgflip returned an error status");
            return None;
        }

        match response.json::<CaptionResponse>().await {
            Ok(CaptionResponse {
                success: true,
                data: Some(data),
                ..
            }) => {
                info!(template_id, url = %data.url, "Meme rendered");
                Some(data.url)
            }
            Ok(body) => {
                error!(
                    template_id,
                    reason = body.error_message.as_deref().unwrap_or("no url in response"),
                    "Imgflip refused to caption"
                );
                None
            }
            Err(e) => {
                error!(error = %e, "Imgflip response was not valid JSON");
                None
            }
        }
    }
}

impl std::fmt::Debug for ImgflipRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImgflipRenderer")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
