pub const CV_EVALUATION_PROMPT: &str = r#"Review the following CV carefully.
1. Rate the CV with a score between 0 and 100. Base the score on the candidate's depth of experience, breadth of skills and the overall quality of the CV.
2. Write a short summary listing the strongest aspects of the CV as bullet points.
3. Give at least 3 and at most 5 actionable recommendations that would make the CV more effective. Recommendations must be bullet points.
4. Return the score, summary and recommendations strictly as a single JSON object with the keys "score", "summary" and "recommendations". "recommendations" must be one text string containing the bullet points.
5. Keep the whole analysis under 3000 characters.
CV content:
"#;

pub fn build_evaluation_prompt(cv_text: &str) -> String {
    format!("{CV_EVALUATION_PROMPT}{cv_text}")
}
