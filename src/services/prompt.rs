//! Post-writing prompt sent to the compose service.

use crate::models::RecipeRecord;

/// Prompt template.
///
/// Supported placeholders: `{page_name}`, `{title}`, `{ingredients}`,
/// `{steps}`, `{share_link}`.
pub const POST_PROMPT: &str = "\
Bạn là một trợ lý biên tập nội dung cho fanpage ẩm thực chay '{page_name}'. \
Nhiệm vụ của bạn là soạn một bài đăng hấp dẫn dựa trên thông tin công thức được cung cấp.

Dựa vào thông tin công thức dưới đây:
- Tên món: {title}
- Nguyên liệu thô:
{ingredients}
- Các bước làm thô:
{steps}

Hãy biên soạn lại thành một bài đăng hoàn chỉnh theo đúng cấu trúc sau, không thêm bất kỳ ghi chú nào khác:

[CHUYÊN MỤC NẤU ĂN CÙNG {page_name_upper}]

(Một đoạn giới thiệu ngắn, hấp dẫn về món ăn, khoảng 2-3 câu, mở đầu bằng chào cả nhà, ...)

NGUYÊN LIỆU:
- (Liệt kê các nguyên liệu và định lượng, định dạng lại cho đẹp mắt)

CÁCH LÀM:
1. (Viết lại các bước thực hiện một cách rõ ràng, văn phong thân thiện, dễ hiểu)
2. ...

KẾT QUẢ:
(Mô tả thành phẩm, ví dụ: \"Món ăn có màu sắc bắt mắt, hương vị đậm đà, dùng với cơm nóng thì còn gì bằng!\")

Chúc các bạn thành công!
Mời các bạn tham khảo và ủng hộ các sản phẩm bên mình ạ {share_link}
";

/// Fill the template for one recipe.
pub fn build_prompt(recipe: &RecipeRecord, page_name: &str, share_link: &str) -> String {
    POST_PROMPT
        .replace("{page_name_upper}", &page_name.to_uppercase())
        .replace("{page_name}", page_name)
        .replace("{share_link}", share_link)
        .replace("{title}", &recipe.title)
        .replace("{ingredients}", &recipe.ingredients)
        .replace("{steps}", &recipe.steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_recipe_and_page() {
        let recipe = RecipeRecord {
            title: "Sườn non chay rim".to_string(),
            ingredients: "300g sườn non chay".to_string(),
            steps: "1. Rim với nước tương".to_string(),
            image_url: "https://img/s.jpg".to_string(),
        };

        let prompt = build_prompt(&recipe, "An Thảo", "https://fb.example/p/1");

        assert!(prompt.contains("fanpage ẩm thực chay 'An Thảo'"));
        assert!(prompt.contains("[CHUYÊN MỤC NẤU ĂN CÙNG AN THẢO]"));
        assert!(prompt.contains("- Tên món: Sườn non chay rim"));
        assert!(prompt.contains("300g sườn non chay"));
        assert!(prompt.contains("1. Rim với nước tương"));
        assert!(prompt.trim_end().ends_with("https://fb.example/p/1"));
        assert!(!prompt.contains('{'));
    }
}
