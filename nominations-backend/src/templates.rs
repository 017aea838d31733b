use handlebars::Handlebars;

use crate::error::AppError;

static INDEX: &str = include_str!("../templates/index.hbs");

pub fn templates() -> Result<Handlebars<'static>, AppError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_template_string("index", INDEX)?;
    Ok(handlebars)
}
