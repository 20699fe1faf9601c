//! テンプレート選択用の system プロンプト

use crate::template::{TemplateCatalog, BLANK_TEMPLATE};
use std::fmt::Write;

const BLANK_DESCRIPTION: &str =
    "Empty starter for simple scripts and trivial tasks that don't require a full template setup";

/// カタログを列挙した選択プロンプトを組み立てる
pub fn build_selection_prompt(catalog: &TemplateCatalog) -> String {
    let mut prompt = String::from(
        "You are an experienced developer who helps people choose the best starter template for their projects.\n\n\
         Available templates:\n",
    );

    // カタログの blank は先頭の固定エントリの説明として使う
    match catalog.blank() {
        Some(blank) if !blank.description.trim().is_empty() => {
            let tags: Vec<&str> = blank.tags.iter().map(String::as_str).collect();
            push_template(&mut prompt, BLANK_TEMPLATE, &blank.description, &tags);
        }
        _ => push_template(&mut prompt, BLANK_TEMPLATE, BLANK_DESCRIPTION, &["basic", "script"]),
    }
    for template in catalog.templates().iter().filter(|t| !t.is_blank()) {
        let tags: Vec<&str> = template.tags.iter().map(String::as_str).collect();
        push_template(&mut prompt, &template.name, &template.description, &tags);
    }

    prompt.push_str(
        "\nResponse Format:\n\
         <selection>\n  \
         <templateName>{selected template name}</templateName>\n  \
         <title>{a proper title for the project}</title>\n\
         </selection>\n\n\
         Examples:\n\n",
    );

    if let Some(example) = catalog.fallback() {
        let _ = write!(
            prompt,
            "<example>\n\
             User: I need to build a {} project\n\
             Response:\n\
             <selection>\n  \
             <templateName>{}</templateName>\n  \
             <title>Simple {} Project</title>\n\
             </selection>\n\
             </example>\n\n",
            example.label, example.name, example.label
        );
    }

    let _ = write!(
        prompt,
        "<example>\n\
         User: Write a script to generate numbers from 1 to 100\n\
         Response:\n\
         <selection>\n  \
         <templateName>{}</templateName>\n  \
         <title>script to generate numbers from 1 to 100</title>\n\
         </selection>\n\
         </example>\n\n",
        BLANK_TEMPLATE
    );

    let _ = write!(
        prompt,
        "Instructions:\n\
         1. For trivial tasks and simple scripts, always recommend the {} template\n\
         2. For more complex projects, recommend templates from the provided list\n\
         3. Follow the exact XML format\n\
         4. Consider both technical requirements and tags\n\
         5. If no perfect match exists, recommend the closest option\n\n\
         Important: Provide only the selection tags in your response, no additional text.\n",
        BLANK_TEMPLATE
    );

    prompt
}

fn push_template(prompt: &mut String, name: &str, description: &str, tags: &[&str]) {
    let _ = write!(
        prompt,
        "<template>\n  <name>{}</name>\n  <description>{}</description>\n  <tags>{}</tags>\n</template>\n",
        name,
        description,
        tags.join(", ")
    );
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
