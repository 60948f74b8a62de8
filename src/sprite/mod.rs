//! Pixel-art sprite pipeline
//!
//! For each character: build a sprite prompt from name and summary, request
//! an image from an OpenAI-compatible image endpoint, download the returned
//! URL, and write two files - the sprite as delivered and a copy with the
//! white matte keyed to transparency. Sprite failures never sink a battle;
//! callers log and move on.

use crate::core::error::{ArenaError, Result};
use image::{DynamicImage, RgbaImage};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Channel floor above which a pixel counts as white matte
const WHITE_MATTE_THRESHOLD: u8 = 240;

/// Build the sprite prompt for one character
pub fn sprite_prompt(name: &str, summary: &str) -> String {
    format!(
        "Create a pixel art sprite of:\n\
name: {}\n\
description: {}\n\n\
Style: Low resolution, 4-6 colors, background is white (character is not), \
bold outlines, no lines on the character itself, simplified design.\n\
Instructions: If a public figure, it should look like them.",
        name, summary
    )
}

/// Async client for the image-generation endpoint
pub struct ImageClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl ImageClient {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
        }
    }

    /// Create a client from environment variables
    ///
    /// Required: IMAGE_API_KEY
    /// Optional: IMAGE_API_URL (defaults to the xAI image endpoint)
    /// Optional: IMAGE_MODEL (defaults to grok-2-image)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("IMAGE_API_KEY")
            .map_err(|_| ArenaError::Sprite("IMAGE_API_KEY not set".into()))?;
        let api_url = std::env::var("IMAGE_API_URL")
            .unwrap_or_else(|_| "https://api.x.ai/v1/images/generations".into());
        let model = std::env::var("IMAGE_MODEL").unwrap_or_else(|_| "grok-2-image".into());

        Ok(Self::new(api_key, api_url, model))
    }

    /// Request one image; returns the hosted URL
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ImagesRequest {
            model: self.model.clone(),
            prompt: prompt.into(),
            n: 1,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ArenaError::Sprite(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ArenaError::Sprite(format!("API error: {}", error_text)));
        }

        let images: ImagesResponse = response
            .json()
            .await
            .map_err(|e| ArenaError::Sprite(e.to_string()))?;

        images
            .data
            .into_iter()
            .next()
            .map(|d| d.url)
            .ok_or_else(|| ArenaError::Sprite("empty image response".into()))
    }

    /// Download a generated image and decode it
    pub async fn download(&self, url: &str) -> Result<DynamicImage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ArenaError::Sprite(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ArenaError::Sprite(format!(
                "download failed with status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ArenaError::Sprite(e.to_string()))?;

        Ok(image::load_from_memory(&bytes)?)
    }

    /// Full pipeline for one character: generate, download, write both files.
    ///
    /// Returns the path of the background-free sprite.
    pub async fn render_character(
        &self,
        name: &str,
        summary: &str,
        dir: &Path,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let prompt = sprite_prompt(name, summary);
        let url = self.generate(&prompt).await?;
        tracing::info!(name, url = %url, "sprite generated");

        let sprite = self.download(&url).await?;

        let stem = file_stem(name);
        let raw_path = dir.join(format!("{}.png", stem));
        sprite.save(&raw_path)?;

        let keyed = key_out_white(&sprite);
        let keyed_path = dir.join(format!("{}_no_bg.png", stem));
        keyed.save(&keyed_path)?;

        Ok(keyed_path)
    }
}

/// Replace the white matte with transparency.
///
/// The sprite prompt pins the background to white and the character to
/// anything else, so a plain channel threshold is the whole job; no smarter
/// segmentation is in scope.
pub fn key_out_white(image: &DynamicImage) -> RgbaImage {
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        if r >= WHITE_MATTE_THRESHOLD && g >= WHITE_MATTE_THRESHOLD && b >= WHITE_MATTE_THRESHOLD {
            pixel.0[3] = 0;
        }
    }
    rgba
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[derive(Serialize)]
struct ImagesRequest {
    model: String,
    prompt: String,
    n: u32,
}

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: String,
}
