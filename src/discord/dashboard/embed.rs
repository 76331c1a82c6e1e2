// Converts the platform-agnostic dashboard view into a serenity embed.

use poise::serenity_prelude as serenity;

use crate::core::dashboard::{DashboardTone, DashboardView};

const GREEN: u32 = 0x2ECC71;
const RED: u32 = 0xE74C3C;

pub fn tone_colour(tone: DashboardTone) -> u32 {
    match tone {
        DashboardTone::Online => GREEN,
        DashboardTone::Offline => RED,
    }
}

pub fn dashboard_embed(view: &DashboardView) -> serenity::CreateEmbed {
    let mut author = serenity::CreateEmbedAuthor::new(&view.author_name);
    let mut footer = serenity::CreateEmbedFooter::new(&view.footer_text);
    if let Some(icon) = &view.icon_url {
        author = author.icon_url(icon);
    }
    if let Some(icon) = &view.footer_icon_url {
        footer = footer.icon_url(icon);
    }

    let mut embed = serenity::CreateEmbed::new()
        .title(&view.title)
        .color(tone_colour(view.tone))
        .author(author)
        .footer(footer)
        .fields(
            view.fields
                .iter()
                .map(|f| (f.name.clone(), f.value.clone(), f.inline)),
        );

    if let Some(icon) = &view.icon_url {
        embed = embed.thumbnail(icon);
    }
    if let Ok(timestamp) = serenity::Timestamp::from_unix_timestamp(view.timestamp.timestamp()) {
        embed = embed.timestamp(timestamp);
    }

    embed
}
