//! DOM for rendered blocks.

use leptos::prelude::*;

use crate::render::{Block, Card, Link, RenderedBlock};

/// One block of the preview page.
#[component]
pub fn BlockView(rendered: RenderedBlock) -> impl IntoView {
    let id = rendered.id.to_string();
    let body = match rendered.block {
        Block::Hero { title, subtitle, image_url, cta } => view! {
            <section class="block block--hero">
                {image_url.map(|src| view! { <img class="block-hero__image" src=src alt=""/> })}
                <h1 class="block-hero__title">{title}</h1>
                {subtitle.map(|s| view! { <p class="block-hero__subtitle">{s}</p> })}
                {cta.map(link_button)}
            </section>
        }
        .into_any(),
        Block::PopularTools { heading, tools } => view! {
            <section class="block block--tools">
                <h2>{heading}</h2>
                <div class="card-row">{tools.into_iter().map(card).collect_view()}</div>
            </section>
        }
        .into_any(),
        Block::CategoryGrid { heading, categories } => view! {
            <section class="block block--categories">
                <h2>{heading}</h2>
                <div class="card-grid">{categories.into_iter().map(card).collect_view()}</div>
            </section>
        }
        .into_any(),
        Block::RichText { html } => view! { <section class="block block--rich-text" inner_html=html></section> }.into_any(),
        Block::Faq { heading, items } => view! {
            <section class="block block--faq">
                <h2>{heading}</h2>
                {items
                    .into_iter()
                    .map(|item| {
                        view! {
                            <details class="faq-item">
                                <summary>{item.question}</summary>
                                <p>{item.answer}</p>
                            </details>
                        }
                    })
                    .collect_view()}
            </section>
        }
        .into_any(),
        Block::CallToAction { heading, body, button } => view! {
            <section class="block block--cta">
                <h2>{heading}</h2>
                {body.map(|b| view! { <p>{b}</p> })}
                {button.map(link_button)}
            </section>
        }
        .into_any(),
        Block::Diagnostic { component_type } => view! {
            <section class="block block--diagnostic" role="alert">
                <strong>"Unknown component type: "</strong>
                <code>{component_type}</code>
            </section>
        }
        .into_any(),
    };

    view! { <div class="block-frame" data-component-id=id>{body}</div> }
}

fn link_button(link: Link) -> impl IntoView {
    view! { <a class="btn btn--primary" href=link.href>{link.label}</a> }
}

fn card(card: Card) -> impl IntoView {
    let title = card.title;
    let inner = view! {
        {card.icon.map(|icon| view! { <span class="card__icon">{icon}</span> })}
        <span class="card__title">{title}</span>
        {card.description.map(|d| view! { <span class="card__description">{d}</span> })}
    };
    match card.href {
        Some(href) => view! { <a class="card" href=href>{inner}</a> }.into_any(),
        None => view! { <div class="card">{inner}</div> }.into_any(),
    }
}
