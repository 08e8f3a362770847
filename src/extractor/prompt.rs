/// Fixed instruction template prepended to the recipe text.
pub const INGREDIENT_EXTRACTION_PROMPT: &str = r#"From the following text (title + body/comment), extract ingredients. Return:
{
  "title": string,
  "description": string,
  "ingredients": string[],
  "normalized": {"name": string, "quantity"?: string, "unit"?: string, "notes"?: string}[]
}
If nothing looks like ingredients, return an empty array. For the description go for short and enegmatic. Example: "refreshing with a bit of intrigue" or "smokey, salty". If you aren't sure, leave it blank.
Title should be "Title Case", and ingredients should have the first letter capitalized."#;
