mod helpers;
mod named_styles;
