//! # Tabfolio
//!
//! The interactive layer of a tabbed single-page portfolio, as a library you
//! can drive without a browser. A page is one static shell with a panel per
//! tab; each panel's content is loaded from a fragment file, and the
//! fragments that hold screenshots are enhanced with carousels and a
//! lightbox. A light/dark theme switch, a mobile menu and a back-to-top
//! button round it out.
//!
//! # Architecture: Document, Components, Page
//!
//! ```text
//! fragments/  ──load──▶  Document  ◀──mutate──  components  ◀──Event──  Page::dispatch
//!                        (arena)                (carousel, lightbox, router, …)
//! ```
//!
//! - A [`dom::Document`] stands in for the browser DOM: an arena of element and
//!   text nodes with attributes, classes, inline styles and a selector subset.
//! - Each component owns only [`dom::NodeId`] handles into that document and
//!   exposes a `handle(&mut Document, &Event)` method. Components never hold
//!   references to each other.
//! - The [`page::Page`] owns the document, the components and the ambient
//!   contexts (history, storage, fragment source, user agent preferences).
//!   [`page::Page::boot`] runs the start-up sequence and
//!   [`page::Page::dispatch`] delivers one [`events::Event`] at a time.
//!
//! Because every observable effect is a change to the document or to a
//! context, tests assert on markup and state instead of screenshots.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | Headless document model, HTML fragment parser, selector subset |
//! | [`events`] | The DOM events components react to, and the dispatch outcome |
//! | [`context`] | History, storage and user agent preference contexts |
//! | [`carousel`] | `.timeline` carousels: buttons, dots, keys, swipes, live region |
//! | [`lightbox`] | Full-screen image viewer with zoom toggle |
//! | [`router`] | Hash-based tab switching with history entries |
//! | [`loader`] | Fragment fetching and content extraction into tab panels |
//! | [`theme`] | Light/dark switch persisted in storage |
//! | [`menu`] | Mobile navigation toggle |
//! | [`back_to_top`] | Scroll-depth button |
//! | [`page`] | Wiring: boot sequence and event dispatch |
//! | [`render`] | Maud templates for the page shell and carousel markup |
//! | [`config`] | `config.toml` loading, validation and CSS generation |
//! | [`site`] | Site directory operations: render, open, check |
//! | [`script`] | TOML replay scripts of user interactions |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Handles Over References
//!
//! A browser lets every listener hold a live reference to any element. Here a
//! component stores `NodeId`s and borrows the document only for the duration
//! of a call. Detached nodes keep their ids, so a carousel built on markup the
//! loader later replaced can notice with [`dom::Document::is_attached`] and be
//! dropped instead of mutating ghosts.
//!
//! ## Idempotent Enhancement
//!
//! Carousels mark their container once every precondition holds, and the
//! lightbox remembers the images it has bound. Running the enhancement pass
//! twice over the same panel does nothing the second time, which matters
//! because every successful tab load triggers one.
//!
//! ## Failures Degrade, Never Abort
//!
//! A missing fragment leaves a placeholder in its panel; a storage write that
//! fails keeps the theme applied for the session; a selector that does not
//! parse matches nothing. Each is logged through `tracing` and the page keeps
//! working. Errors only propagate out of the library at the edges: reading
//! config, scripts and the site directory.
//!
//! ## Maud For The Shell
//!
//! The page shell is rendered with [Maud](https://maud.lambda.xyz/), so the
//! markup components expect (ids, classes, ARIA attributes) is checked at
//! compile time and shared between the renderer and the tests.

pub mod back_to_top;
pub mod carousel;
pub mod config;
pub mod context;
pub mod dom;
pub mod events;
pub mod lightbox;
pub mod loader;
pub mod menu;
pub mod output;
pub mod page;
pub mod render;
pub mod router;
pub mod script;
pub mod site;
pub mod theme;

#[cfg(test)]
pub(crate) mod test_helpers;
