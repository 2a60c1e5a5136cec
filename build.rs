// Embeds git and build metadata for `tokengate --version`.
fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::ShadowBuilder::builder().build()?;
    Ok(())
}
