use dioxus::prelude::*;

#[component]
pub fn DocsPanel() -> Element {
    rsx! {
        div { style: "max-width: 760px; line-height: 1.5;",
            h2 { style: "color: #f7931a;", "How do the calculations work?" }
            p {
                "Each statistic is rescaled with min-max normalization. For the share of adults with a bachelor's degree, "
                "West Virginia is lowest at 24.0% and Massachusetts highest at 47.8%. With a weight of 42 the rescaling is "
                code { "x' = 42 (x - 24) / 23.8" }
                ", so Massachusetts scores 42, West Virginia 0, and every other state lands in between."
            }
            h2 { style: "color: #f7931a;", "Why is this necessary?" }
            p {
                "Statistics come in different units. Rescaling each one onto a common range of points lets them be added. "
                "Some statistics are inverse: a lower value is better, such as the uninsured rate. Those are rescaled onto "
                "the reversed range, so the lowest raw value earns the full weight. A higher total score is always better."
            }
            h2 { style: "color: #f7931a;", "How do I use it?" }
            p {
                "Set a weight for each statistic on the left, within the points budget. The map and the table update as you type. "
                "The code shown under the inputs captures every weight; paste it into the code box later, or share it, to restore them."
            }
        }
    }
}
