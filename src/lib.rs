//! The library code for `shikimark`. It covers two things:
//!
//! 1. Loading the site's declarative configuration (`site.yaml`) into typed
//!    values ([`crate::config`]): the site URL, integrations, highlighting
//!    options, and bundler plugins.
//! 2. Rendering Markdown documents ([`crate::document`], [`crate::markdown`])
//!    with code blocks routed through a [`crate::highlight::Highlighter`].
//!
//! The highlighter builds a wrapper element ([`crate::node::RenderNode`]) for
//! each code block and runs the configured [`crate::transform::Transformer`]
//! hooks over it before it is serialized. The built-in `language-marker`
//! transformer records the block's declared language as a `data-language`
//! attribute on the `<pre>` element, so stylesheets can key labels or icons
//! off it without re-parsing the rendered code.
//!
//! Data files are loaded by [`crate::data`] when the `yaml` bundler plugin is
//! registered.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod data;
pub mod document;
mod escape;
pub mod highlight;
pub mod htmlrenderer;
pub mod markdown;
pub mod node;
pub mod transform;
pub mod url;
