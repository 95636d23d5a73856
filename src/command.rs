use crate::modes::OptionModel;

/// Splits the extra-args field on runs of whitespace. No quoting support.
pub fn tokenize_extra(extra: &str) -> Vec<String> {
    extra.split_whitespace().map(str::to_owned).collect()
}

/// Argument vector for the current form: the raw binary field, the selected
/// mode's tokens, then the extra tokens. The binary is not resolved here.
pub fn build(model: &OptionModel) -> Vec<String> {
    let mode = model.selected();

    let mut command = Vec::with_capacity(1 + mode.tokens.len());
    command.push(model.binary.clone());
    command.extend(mode.tokens.iter().map(|t| (*t).to_owned()));
    command.extend(tokenize_extra(&model.extra_args));
    command
}

pub fn preview(model: &OptionModel) -> String {
    build(model).join(" ")
}
